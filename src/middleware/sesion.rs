// src/middleware/sesion.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState};

const HEADER_SESION: &str = "x-sesion-id";

fn sesion_del_request(req: &Request) -> Option<Uuid> {
    req.headers()
        .get(HEADER_SESION)
        .and_then(|valor| valor.to_str().ok())
        .and_then(|valor| Uuid::parse_str(valor).ok())
}

/// Refresca `ultima_actividad` de la sesión que viene en X-Sesion-Id.
/// Es sólo seguimiento: sin header, con sesión cerrada o con la base
/// caída, el request sigue igual.
pub async fn actividad_sesion(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(sesion_id) = sesion_del_request(&req) {
        if let Err(error) = state.usuarios_repo.tocar_sesion(sesion_id).await {
            tracing::warn!(%sesion_id, ?error, "No se pudo refrescar la actividad de la sesión");
        }
    }

    next.run(req).await
}

/// Exige una sesión abierta para continuar. Se aplica a las rutas que
/// modifican datos.
pub async fn sesion_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let sesion_id = sesion_del_request(&req).ok_or(AppError::SesionInvalida)?;

    let filas = state.usuarios_repo.tocar_sesion(sesion_id).await?;
    if filas == 0 {
        return Err(AppError::SesionInvalida);
    }

    Ok(next.run(req).await)
}
