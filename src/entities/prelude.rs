pub use super::estudiantes::Entity as Estudiantes;
pub use super::materias::Entity as Materias;
pub use super::matriculas::Entity as Matriculas;
pub use super::pagos::Entity as Pagos;
pub use super::periodos::Entity as Periodos;
pub use super::planes_estudio::Entity as PlanesEstudio;
pub use super::profesores::Entity as Profesores;
pub use super::roles::Entity as Roles;
pub use super::usuarios::Entity as Usuarios;
