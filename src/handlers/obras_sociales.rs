// src/handlers/obras_sociales.rs

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
    models::obras_sociales::{
        AuditoriaObraSocial, FiltrosLiquidacion, NuevaObraSocial, ObraSocial,
        ResultadoLiquidacion,
    },
};

#[derive(Debug, Deserialize)]
pub struct ParamsEliminar {
    #[serde(rename = "usuarioId")]
    pub usuario_id: Option<i32>,
}

pub async fn obtener_obras_sociales(
    State(state): State<AppState>,
) -> Result<Json<Vec<ObraSocial>>, AppError> {
    let obras = state.obras_sociales_repo.obtener_obras_sociales().await?;
    Ok(Json(obras))
}

pub async fn crear_obra_social(
    State(state): State<AppState>,
    Json(payload): Json<NuevaObraSocial>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let obra_social_id = state
        .obras_sociales_service
        .crear_obra_social(payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "obra_social_id": obra_social_id })),
    ))
}

pub async fn actualizar_obra_social(
    State(state): State<AppState>,
    Path(obra_social_id): Path<i32>,
    Json(payload): Json<NuevaObraSocial>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    state
        .obras_sociales_service
        .actualizar_obra_social(obra_social_id, payload)
        .await?;

    Ok(Json(json!({ "mensaje": "Obra social actualizada correctamente" })))
}

pub async fn eliminar_obra_social(
    State(state): State<AppState>,
    Path(obra_social_id): Path<i32>,
    Query(params): Query<ParamsEliminar>,
) -> Result<Json<Value>, AppError> {
    state
        .obras_sociales_service
        .eliminar_obra_social(obra_social_id, params.usuario_id)
        .await?;

    Ok(Json(json!({ "mensaje": "Obra social eliminada correctamente" })))
}

/// Historial de auditoría de una obra social, lo más reciente primero.
pub async fn obtener_auditoria(
    State(state): State<AppState>,
    Path(obra_social_id): Path<i32>,
) -> Result<Json<Vec<AuditoriaObraSocial>>, AppError> {
    let auditoria = state
        .obras_sociales_repo
        .obtener_auditoria(obra_social_id)
        .await?;
    Ok(Json(auditoria))
}

/// Liquidación del período: ventas agrupadas por obra social con el
/// aporte de cada una y el total a cargo de los pacientes.
pub async fn obtener_liquidacion(
    State(state): State<AppState>,
    Query(filtros): Query<FiltrosLiquidacion>,
) -> Result<Json<ResultadoLiquidacion>, AppError> {
    let liquidacion = state
        .liquidacion_service
        .generar_liquidacion(filtros)
        .await?;
    Ok(Json(liquidacion))
}
