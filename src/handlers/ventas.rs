// src/handlers/ventas.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::ventas::{FiltrosVentas, NuevaVenta, VentaConItems},
};

pub async fn obtener_ventas(
    State(state): State<AppState>,
    Query(filtros): Query<FiltrosVentas>,
) -> Result<Json<Vec<VentaConItems>>, AppError> {
    let ventas = state.ventas_repo.obtener_ventas(&filtros).await?;
    Ok(Json(ventas))
}

pub async fn obtener_venta(
    State(state): State<AppState>,
    Path(venta_id): Path<i32>,
) -> Result<Json<VentaConItems>, AppError> {
    let venta = state
        .ventas_repo
        .obtener_por_id(venta_id)
        .await?
        .ok_or(AppError::NoEncontrado("Venta"))?;

    Ok(Json(venta))
}

pub async fn crear_venta(
    State(state): State<AppState>,
    Json(payload): Json<NuevaVenta>,
) -> Result<(StatusCode, Json<VentaConItems>), AppError> {
    payload.validate()?;

    let venta = state.ventas_service.registrar_venta(payload).await?;
    Ok((StatusCode::CREATED, Json(venta)))
}
