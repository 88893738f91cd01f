// src/handlers/lotes.rs

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
    db::FiltrosLotes,
    models::lotes::{AjusteCantidadLote, Lote, MovimientoLote, NuevoLote, ResultadoAjuste},
};

#[derive(Debug, Deserialize)]
pub struct ParamsListado {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    pub search: Option<String>,
    #[serde(rename = "productoId")]
    pub producto_id: Option<i32>,
    pub estado: Option<String>,
    #[serde(rename = "diasVencimiento")]
    pub dias_vencimiento: Option<i32>,
}

pub async fn obtener_lotes(
    State(state): State<AppState>,
    Query(params): Query<ParamsListado>,
) -> Result<Json<Vec<Lote>>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 100);

    let filtros = FiltrosLotes {
        search: params.search,
        producto_id: params.producto_id,
        estado: params.estado,
        dias_vencimiento: params.dias_vencimiento,
    };

    let lotes = state.lotes_repo.obtener_lotes(page, page_size, &filtros).await?;
    Ok(Json(lotes))
}

pub async fn crear_lote(
    State(state): State<AppState>,
    Json(payload): Json<NuevoLote>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let lote_id = state.lotes_repo.agregar_lote(&payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "lote_id": lote_id }))))
}

pub async fn obtener_movimientos(
    State(state): State<AppState>,
    Path(lote_id): Path<i32>,
) -> Result<Json<Vec<MovimientoLote>>, AppError> {
    let movimientos = state.lotes_repo.obtener_movimientos(lote_id).await?;
    Ok(Json(movimientos))
}

pub async fn ajustar_cantidad(
    State(state): State<AppState>,
    Path(lote_id): Path<i32>,
    Json(payload): Json<AjusteCantidadLote>,
) -> Result<Json<ResultadoAjuste>, AppError> {
    payload.validate()?;

    let resultado = state.lotes_service.ajustar_cantidad(lote_id, payload).await?;
    Ok(Json(resultado))
}
