// src/handlers/auth.rs

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{LoginPayload, LoginResponse, LogoutPayload, Sesion},
};

fn header_como_texto(headers: &HeaderMap, nombre: &str) -> Option<String> {
    headers
        .get(nombre)
        .and_then(|valor| valor.to_str().ok())
        .map(str::to_string)
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let navegador = header_como_texto(&headers, "user-agent");
    // Detrás del proxy la IP real viene en X-Forwarded-For.
    let ip = header_como_texto(&headers, "x-forwarded-for")
        .map(|valor| valor.split(',').next().unwrap_or("").trim().to_string())
        .filter(|valor| !valor.is_empty());

    let respuesta = state.auth_service.login(payload, navegador, ip).await?;
    Ok(Json(respuesta))
}

pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutPayload>,
) -> Result<Json<Value>, AppError> {
    state.auth_service.logout(payload.sesion_id).await?;
    Ok(Json(json!({ "mensaje": "Sesión cerrada correctamente" })))
}

/// Historial de sesiones, las activas primero.
pub async fn obtener_sesiones(
    State(state): State<AppState>,
) -> Result<Json<Vec<Sesion>>, AppError> {
    let sesiones = state.usuarios_repo.obtener_sesiones().await?;
    Ok(Json(sesiones))
}
