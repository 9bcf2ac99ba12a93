pub mod prelude;

pub mod estudiantes;
pub mod materias;
pub mod matriculas;
pub mod pagos;
pub mod periodos;
pub mod planes_estudio;
pub mod profesores;
pub mod roles;
pub mod usuarios;
