// src/handlers/proveedores.rs

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
    models::proveedores::{NuevoProveedor, Proveedor},
};

#[derive(Debug, Deserialize)]
pub struct ParamsListado {
    pub search: Option<String>,
}

pub async fn obtener_proveedores(
    State(state): State<AppState>,
    Query(params): Query<ParamsListado>,
) -> Result<Json<Vec<Proveedor>>, AppError> {
    let proveedores = state
        .proveedores_repo
        .obtener_proveedores(params.search.as_deref())
        .await?;

    Ok(Json(proveedores))
}

pub async fn obtener_proveedor(
    State(state): State<AppState>,
    Path(proveedor_id): Path<i32>,
) -> Result<Json<Proveedor>, AppError> {
    let proveedor = state
        .proveedores_repo
        .obtener_por_id(proveedor_id)
        .await?
        .ok_or(AppError::NoEncontrado("Proveedor"))?;

    Ok(Json(proveedor))
}

pub async fn crear_proveedor(
    State(state): State<AppState>,
    Json(payload): Json<NuevoProveedor>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let proveedor_id = state.proveedores_repo.agregar_proveedor(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "proveedor_id": proveedor_id })),
    ))
}

pub async fn actualizar_proveedor(
    State(state): State<AppState>,
    Path(proveedor_id): Path<i32>,
    Json(payload): Json<NuevoProveedor>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let filas = state
        .proveedores_repo
        .actualizar_proveedor(proveedor_id, &payload)
        .await?;
    if filas == 0 {
        return Err(AppError::NoEncontrado("Proveedor"));
    }

    Ok(Json(json!({ "mensaje": "Proveedor actualizado correctamente" })))
}

pub async fn eliminar_proveedor(
    State(state): State<AppState>,
    Path(proveedor_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let filas = state.proveedores_repo.eliminar_proveedor(proveedor_id).await?;
    if filas == 0 {
        return Err(AppError::NoEncontrado("Proveedor"));
    }

    Ok(Json(json!({ "mensaje": "Proveedor eliminado correctamente" })))
}
