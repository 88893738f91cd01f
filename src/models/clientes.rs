// src/models/clientes.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cliente {
    pub cliente_id: i32,
    pub nombre: String,
    pub apellido: String,
    pub dni: Option<String>,
    pub obra_social_id: Option<i32>,
    pub obra_social: Option<String>,
    pub ciudad_id: Option<i32>,
    pub ciudad: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NuevoCliente {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,
    #[validate(length(min = 1, message = "El apellido es obligatorio."))]
    pub apellido: String,
    pub dni: Option<String>,
    pub obra_social_id: Option<i32>,
    pub ciudad_id: Option<i32>,
    pub usuario_id: Option<i32>,
}

// Registro de auditoría de clientes (CREAR / ACTUALIZAR / ELIMINAR).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditoriaCliente {
    pub auditoria_id: i32,
    pub cliente_id: Option<i32>,
    pub accion: String,
    pub detalle_cambio: Option<String>,
    pub fecha_movimiento: DateTime<Utc>,
    pub usuario_id: Option<i32>,
}
