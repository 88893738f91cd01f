// src/handlers/notificaciones.rs

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    models::vencimientos::{ResultadoNotificaciones, ResultadoPrediccion},
};

#[derive(Debug, Deserialize)]
pub struct ParamsNotificaciones {
    pub dias: Option<i64>,
    #[serde(rename = "enviarEmail")]
    pub enviar_email: Option<bool>,
}

/// GET /api/notificaciones-ia?dias=30&enviarEmail=true
///
/// Corre el análisis de vencimientos. Con enviarEmail=true y una
/// situación crítica, además despacha la alerta por correo; un fallo
/// del email no voltea la respuesta.
pub async fn obtener_notificaciones(
    State(state): State<AppState>,
    Query(params): Query<ParamsNotificaciones>,
) -> Result<Json<ResultadoNotificaciones>, AppError> {
    let dias = params
        .dias
        .unwrap_or(state.vencimientos_service.config().dias_anticipacion_default);

    let resultado = state.vencimientos_service.generar_notificaciones(dias).await?;

    let situacion_critica = resultado.resumen.lotes_vencidos > 0
        || resultado.resumen.lotes_alta_prioridad > 5;

    if params.enviar_email.unwrap_or(false) && situacion_critica {
        if let Err(error) = state.email_service.enviar_alerta_vencimientos(&resultado).await {
            tracing::error!(?error, "❌ Error al enviar email de alerta");
        }
    }

    Ok(Json(resultado))
}

/// GET /api/notificaciones-ia/predicciones
pub async fn obtener_predicciones(
    State(state): State<AppState>,
) -> Result<Json<ResultadoPrediccion>, AppError> {
    let prediccion = state.vencimientos_service.predecir_vencimientos_futuros().await?;
    Ok(Json(prediccion))
}
