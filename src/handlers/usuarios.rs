// src/handlers/usuarios.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{ActualizarUsuario, CambioPassword, NuevoUsuario, Rol, UsuarioListado},
};

#[derive(Debug, Deserialize)]
pub struct ParamsListado {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    pub search: Option<String>,
    #[serde(rename = "rolID")]
    pub rol_id: Option<i32>,
}

pub async fn obtener_usuarios(
    State(state): State<AppState>,
    Query(params): Query<ParamsListado>,
) -> Result<Json<Vec<UsuarioListado>>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 100);
    let search = params.search.unwrap_or_default();

    let usuarios = state
        .usuarios_repo
        .obtener_usuarios(page, page_size, &search, params.rol_id)
        .await?;

    Ok(Json(usuarios))
}

pub async fn crear_usuario(
    State(state): State<AppState>,
    Json(payload): Json<NuevoUsuario>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let usuario_id = state.usuarios_service.crear_usuario(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "mensaje": "Usuario agregado correctamente",
            "usuario_id": usuario_id,
        })),
    ))
}

pub async fn actualizar_usuario(
    State(state): State<AppState>,
    Path(usuario_id): Path<i32>,
    Json(payload): Json<ActualizarUsuario>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    state
        .usuarios_service
        .actualizar_usuario(usuario_id, payload)
        .await?;

    Ok(Json(json!({ "mensaje": "Usuario actualizado correctamente" })))
}

/// El cambio de contraseña va aparte de la edición de datos: el
/// usuario se identifica por correo y sólo viaja la contraseña nueva.
pub async fn cambiar_password(
    State(state): State<AppState>,
    Path(correo): Path<String>,
    Json(payload): Json<CambioPassword>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    state
        .usuarios_service
        .cambiar_password(&correo, payload.password)
        .await?;

    Ok(Json(json!({ "mensaje": "Contraseña actualizada correctamente" })))
}

pub async fn eliminar_usuario(
    State(state): State<AppState>,
    Path(usuario_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    state.usuarios_service.eliminar_usuario(usuario_id).await?;

    Ok(Json(json!({ "mensaje": "Usuario eliminado correctamente" })))
}

pub async fn obtener_roles(State(state): State<AppState>) -> Result<Json<Vec<Rol>>, AppError> {
    let roles = state.usuarios_repo.obtener_roles().await?;
    Ok(Json(roles))
}
