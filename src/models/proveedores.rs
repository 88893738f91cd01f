// src/models/proveedores.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Proveedor {
    pub proveedor_id: i32,
    pub razon_social: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NuevoProveedor {
    #[validate(length(min = 1, message = "La razón social es obligatoria."))]
    pub razon_social: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    #[validate(email(message = "El email proporcionado es inválido."))]
    pub email: Option<String>,
}
