// src/handlers/productos.rs

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
    models::productos::{AuditoriaProducto, FiltrosProductos, NuevoProducto, Producto},
};

#[derive(Debug, Deserialize)]
pub struct ParamsListado {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParamsEliminar {
    #[serde(rename = "usuarioId")]
    pub usuario_id: Option<i32>,
}

pub async fn obtener_productos(
    State(state): State<AppState>,
    Query(params): Query<ParamsListado>,
) -> Result<Json<Vec<Producto>>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 100);
    let search = params.search.unwrap_or_default();

    let productos = state
        .productos_repo
        .obtener_productos(page, page_size, &search)
        .await?;

    Ok(Json(productos))
}

pub async fn obtener_producto(
    State(state): State<AppState>,
    Path(producto_id): Path<i32>,
) -> Result<Json<Producto>, AppError> {
    let producto = state
        .productos_repo
        .obtener_por_id(&state.db_pool, producto_id)
        .await?
        .ok_or(AppError::NoEncontrado("Producto"))?;

    Ok(Json(producto))
}

pub async fn crear_producto(
    State(state): State<AppState>,
    Json(payload): Json<NuevoProducto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let producto_id = state.productos_service.crear_producto(payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "producto_id": producto_id }))))
}

pub async fn actualizar_producto(
    State(state): State<AppState>,
    Path(producto_id): Path<i32>,
    Json(payload): Json<NuevoProducto>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    state
        .productos_service
        .actualizar_producto(producto_id, payload)
        .await?;

    Ok(Json(json!({ "mensaje": "Producto actualizado correctamente" })))
}

pub async fn eliminar_producto(
    State(state): State<AppState>,
    Path(producto_id): Path<i32>,
    Query(params): Query<ParamsEliminar>,
) -> Result<Json<Value>, AppError> {
    state
        .productos_service
        .eliminar_producto(producto_id, params.usuario_id)
        .await?;

    Ok(Json(json!({ "mensaje": "Producto eliminado correctamente" })))
}

/// Historial de auditoría de un producto, lo más reciente primero.
pub async fn obtener_auditoria(
    State(state): State<AppState>,
    Path(producto_id): Path<i32>,
) -> Result<Json<Vec<AuditoriaProducto>>, AppError> {
    let auditoria = state.productos_repo.obtener_auditoria(producto_id).await?;
    Ok(Json(auditoria))
}

pub async fn obtener_filtros(
    State(state): State<AppState>,
) -> Result<Json<FiltrosProductos>, AppError> {
    let categorias = state.productos_repo.obtener_categorias().await?;
    let marcas = state.productos_repo.obtener_marcas().await?;

    Ok(Json(FiltrosProductos { categorias, marcas }))
}
