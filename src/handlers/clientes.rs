// src/handlers/clientes.rs

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
    models::{
        clientes::{AuditoriaCliente, Cliente, NuevoCliente},
        ventas::VentaConItems,
    },
};

#[derive(Debug, Deserialize)]
pub struct ParamsListado {
    pub search: Option<String>,
    #[serde(rename = "obraSocialId")]
    pub obra_social_id: Option<i32>,
    #[serde(rename = "ciudadId")]
    pub ciudad_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ParamsEliminar {
    #[serde(rename = "usuarioId")]
    pub usuario_id: Option<i32>,
}

pub async fn obtener_clientes(
    State(state): State<AppState>,
    Query(params): Query<ParamsListado>,
) -> Result<Json<Vec<Cliente>>, AppError> {
    let clientes = state
        .clientes_repo
        .obtener_clientes(
            params.search.as_deref(),
            params.obra_social_id,
            params.ciudad_id,
        )
        .await?;

    Ok(Json(clientes))
}

pub async fn obtener_cliente(
    State(state): State<AppState>,
    Path(cliente_id): Path<i32>,
) -> Result<Json<Cliente>, AppError> {
    let cliente = state
        .clientes_repo
        .obtener_por_id(&state.db_pool, cliente_id)
        .await?
        .ok_or(AppError::NoEncontrado("Cliente"))?;

    Ok(Json(cliente))
}

/// Últimas compras del cliente, para su ficha.
pub async fn obtener_ventas_cliente(
    State(state): State<AppState>,
    Path(cliente_id): Path<i32>,
) -> Result<Json<Vec<VentaConItems>>, AppError> {
    let ventas = state.ventas_repo.ultimas_ventas_cliente(cliente_id).await?;
    Ok(Json(ventas))
}

pub async fn crear_cliente(
    State(state): State<AppState>,
    Json(payload): Json<NuevoCliente>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let cliente_id = state.clientes_service.crear_cliente(payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "cliente_id": cliente_id }))))
}

pub async fn actualizar_cliente(
    State(state): State<AppState>,
    Path(cliente_id): Path<i32>,
    Json(payload): Json<NuevoCliente>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    state
        .clientes_service
        .actualizar_cliente(cliente_id, payload)
        .await?;

    Ok(Json(json!({ "mensaje": "Cliente actualizado correctamente" })))
}

pub async fn eliminar_cliente(
    State(state): State<AppState>,
    Path(cliente_id): Path<i32>,
    Query(params): Query<ParamsEliminar>,
) -> Result<Json<Value>, AppError> {
    state
        .clientes_service
        .eliminar_cliente(cliente_id, params.usuario_id)
        .await?;

    Ok(Json(json!({ "mensaje": "Cliente eliminado correctamente" })))
}

/// Historial de auditoría de un cliente, lo más reciente primero.
pub async fn obtener_auditoria(
    State(state): State<AppState>,
    Path(cliente_id): Path<i32>,
) -> Result<Json<Vec<AuditoriaCliente>>, AppError> {
    let auditoria = state.clientes_repo.obtener_auditoria(cliente_id).await?;
    Ok(Json(auditoria))
}
