// src/services/lotes_service.rs

use crate::{
    common::error::AppError,
    db::LotesRepository,
    models::lotes::{AjusteCantidadLote, ResultadoAjuste},
};

#[derive(Clone)]
pub struct LotesService {
    repo: LotesRepository,
}

impl LotesService {
    pub fn new(repo: LotesRepository) -> Self {
        Self { repo }
    }

    /// Ajusta la cantidad de un lote y deja el movimiento en el kardex.
    /// El tipo de movimiento sale del signo de la diferencia: más stock
    /// es ENTRADA, menos es SALIDA y sin cambio queda como AJUSTE.
    pub async fn ajustar_cantidad(
        &self,
        lote_id: i32,
        ajuste: AjusteCantidadLote,
    ) -> Result<ResultadoAjuste, AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let cantidad_anterior = self
            .repo
            .cantidad_actual(&mut *tx, lote_id)
            .await?
            .ok_or(AppError::NoEncontrado("Lote"))?;

        let diferencia = ajuste.nueva_cantidad - cantidad_anterior;
        let tipo_movimiento = if diferencia > 0 {
            "ENTRADA"
        } else if diferencia < 0 {
            "SALIDA"
        } else {
            "AJUSTE"
        };

        self.repo
            .actualizar_cantidad(&mut *tx, lote_id, ajuste.nueva_cantidad)
            .await?;

        self.repo
            .registrar_movimiento(
                &mut *tx,
                lote_id,
                tipo_movimiento,
                diferencia.abs(),
                cantidad_anterior,
                ajuste.nueva_cantidad,
                ajuste.motivo.as_deref(),
                ajuste.referencia_tipo.as_deref(),
                ajuste.referencia_id,
                ajuste.usuario_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            lote_id,
            tipo_movimiento,
            cantidad_anterior,
            cantidad_nueva = ajuste.nueva_cantidad,
            "Cantidad de lote ajustada"
        );

        Ok(ResultadoAjuste {
            cantidad_anterior,
            cantidad_nueva: ajuste.nueva_cantidad,
        })
    }
}
