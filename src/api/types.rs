use chrono::NaiveDate;
use serde::Serialize;

use crate::db::{EnrollmentRow, PaymentRow, ProfileRow, SubjectRow, UserRow};
use crate::entities::{
    estudiantes, materias, pagos::EstadoPago, periodos, planes_estudio, profesores, roles,
};

/// Response envelope: `{"success": bool, "message"?: string, ...payload}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Identifier of a freshly created row.
#[derive(Debug, Serialize)]
pub struct Created<K> {
    pub id: K,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UsuarioDto {
    #[serde(rename = "UsuarioID")]
    pub usuario_id: i32,
    pub nombre_completo: String,
    pub correo: String,
    pub estado: bool,
    pub nombre_rol: String,
}

impl From<UserRow> for UsuarioDto {
    fn from(row: UserRow) -> Self {
        Self {
            usuario_id: row.usuario_id,
            nombre_completo: row.nombre_completo,
            correo: row.correo,
            estado: row.estado,
            nombre_rol: row.nombre_rol,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PerfilDto {
    #[serde(rename = "UsuarioID")]
    pub usuario_id: i32,
    pub nombre_completo: String,
    pub correo: String,
    pub nombre_rol: String,
}

impl From<ProfileRow> for PerfilDto {
    fn from(row: ProfileRow) -> Self {
        Self {
            usuario_id: row.usuario_id,
            nombre_completo: row.nombre_completo,
            correo: row.correo,
            nombre_rol: row.nombre_rol,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RolDto {
    #[serde(rename = "RolID")]
    pub rol_id: i32,
    pub nombre_rol: String,
}

impl From<roles::Model> for RolDto {
    fn from(model: roles::Model) -> Self {
        Self {
            rol_id: model.rol_id,
            nombre_rol: model.nombre_rol,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlanDto {
    #[serde(rename = "PlanID")]
    pub plan_id: i32,
    pub nombre_plan: String,
    pub anio_inicio: i32,
    pub estado: bool,
}

impl From<planes_estudio::Model> for PlanDto {
    fn from(model: planes_estudio::Model) -> Self {
        Self {
            plan_id: model.plan_id,
            nombre_plan: model.nombre_plan,
            anio_inicio: model.anio_inicio,
            estado: model.estado,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MateriaDto {
    pub codigo: String,
    pub nombre: String,
    pub creditos: i32,
    #[serde(rename = "PlanID")]
    pub plan_id: Option<i32>,
    pub estado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_plan: Option<String>,
}

impl From<SubjectRow> for MateriaDto {
    fn from(row: SubjectRow) -> Self {
        Self {
            codigo: row.codigo,
            nombre: row.nombre,
            creditos: row.creditos,
            plan_id: row.plan_id,
            estado: row.estado,
            nombre_plan: row.nombre_plan,
        }
    }
}

impl From<materias::Model> for MateriaDto {
    fn from(model: materias::Model) -> Self {
        Self {
            codigo: model.codigo,
            nombre: model.nombre,
            creditos: model.creditos,
            plan_id: model.plan_id,
            estado: model.estado,
            nombre_plan: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EstudianteDto {
    #[serde(rename = "EstudianteID")]
    pub estudiante_id: i32,
    pub cedula: String,
    pub nombre: String,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub estado: bool,
}

impl From<estudiantes::Model> for EstudianteDto {
    fn from(model: estudiantes::Model) -> Self {
        Self {
            estudiante_id: model.estudiante_id,
            cedula: model.cedula,
            nombre: model.nombre,
            fecha_nacimiento: model.fecha_nacimiento,
            correo: model.correo,
            telefono: model.telefono,
            estado: model.estado,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfesorDto {
    #[serde(rename = "ProfesorID")]
    pub profesor_id: i32,
    pub nombre: String,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub estado: bool,
}

impl From<profesores::Model> for ProfesorDto {
    fn from(model: profesores::Model) -> Self {
        Self {
            profesor_id: model.profesor_id,
            nombre: model.nombre,
            correo: model.correo,
            telefono: model.telefono,
            estado: model.estado,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PeriodoDto {
    #[serde(rename = "PeriodoID")]
    pub periodo_id: i32,
    pub nombre: String,
    pub anio: i32,
    pub estado: bool,
}

impl From<periodos::Model> for PeriodoDto {
    fn from(model: periodos::Model) -> Self {
        Self {
            periodo_id: model.periodo_id,
            nombre: model.nombre,
            anio: model.anio,
            estado: model.estado,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatriculaDto {
    #[serde(rename = "MatriculaID")]
    pub matricula_id: i32,
    /// `"nombre - cedula"`
    pub estudiante: String,
    pub periodo: String,
    pub anio: i32,
}

impl From<EnrollmentRow> for MatriculaDto {
    fn from(row: EnrollmentRow) -> Self {
        Self {
            estudiante: row.student_label(),
            matricula_id: row.matricula_id,
            periodo: row.periodo,
            anio: row.anio,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PagoDto {
    #[serde(rename = "PagoID")]
    pub pago_id: i32,
    #[serde(rename = "MatriculaID")]
    pub matricula_id: i32,
    pub monto: f64,
    pub fecha_pago: String,
    pub metodo: Option<String>,
    pub referencia: Option<String>,
    pub estado: EstadoPago,
    pub estudiante: String,
}

impl From<PaymentRow> for PagoDto {
    fn from(row: PaymentRow) -> Self {
        Self {
            pago_id: row.pago_id,
            matricula_id: row.matricula_id,
            monto: row.monto,
            fecha_pago: row.fecha_pago,
            metodo: row.metodo,
            referencia: row.referencia,
            estado: row.estado,
            estudiante: row.estudiante,
        }
    }
}
