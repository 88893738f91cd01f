use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Correo o contraseña incorrectos")]
    CredencialesInvalidas,

    #[error("Sesión inválida o cerrada")]
    SesionInvalida,

    #[error("El correo ya está registrado")]
    CorreoRegistrado,

    #[error("{0} no encontrado")]
    NoEncontrado(&'static str),

    #[error(
        "Stock insuficiente para el producto ID {producto_id}. Disponible: {disponible}, Solicitado: {solicitado}"
    )]
    StockInsuficiente {
        producto_id: i32,
        disponible: i32,
        solicitado: i32,
    },

    #[error("No se pueden agregar ventas sin items")]
    VentaSinItems,

    // Variante para errores de base de datos (sqlx)
    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado.
    // `anyhow::Error` es ideal para capturar el contexto del error.
    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Error de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mensaje) = match self {
            // Devolvemos todos los detalles de la validación, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "mensaje": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::CredencialesInvalidas => (
                StatusCode::UNAUTHORIZED,
                "Correo o contraseña incorrectos".to_string(),
            ),
            AppError::SesionInvalida => (
                StatusCode::UNAUTHORIZED,
                "Sesión inválida o cerrada".to_string(),
            ),
            AppError::CorreoRegistrado => (
                StatusCode::CONFLICT,
                "El correo ya está registrado".to_string(),
            ),
            AppError::NoEncontrado(recurso) => {
                (StatusCode::NOT_FOUND, format!("{recurso} no encontrado"))
            }
            ref e @ AppError::StockInsuficiente { .. } => (StatusCode::CONFLICT, e.to_string()),
            ref e @ AppError::VentaSinItems => (StatusCode::BAD_REQUEST, e.to_string()),

            // Todos los demás (DatabaseError, InternalServerError, Bcrypt) terminan en 500.
            // `tracing` loguea el mensaje detallado que `thiserror` nos dio.
            ref e => {
                tracing::error!("Error interno del servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error inesperado.".to_string(),
                )
            }
        };

        // Respuesta estándar para errores simples que sólo llevan un mensaje.
        let body = Json(json!({ "mensaje": mensaje }));
        (status, body).into_response()
    }
}
