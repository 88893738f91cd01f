// src/services/obras_sociales_service.rs

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::{
    common::error::AppError,
    db::ObrasSocialesRepository,
    models::obras_sociales::{NuevaObraSocial, ObraSocial},
};

#[derive(Clone)]
pub struct ObrasSocialesService {
    repo: ObrasSocialesRepository,
}

impl ObrasSocialesService {
    pub fn new(repo: ObrasSocialesRepository) -> Self {
        Self { repo }
    }

    /// Alta de obra social con su registro de auditoría, en una
    /// transacción.
    pub async fn crear_obra_social(&self, nueva: NuevaObraSocial) -> Result<i32, AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let obra_social_id = self.repo.agregar_obra_social(&mut *tx, &nueva).await?;

        let detalle = format!("Obra social creada: {}", nueva.obra_social);
        self.repo
            .registrar_auditoria(&mut *tx, obra_social_id, "CREAR", &detalle, nueva.usuario_id)
            .await?;

        tx.commit().await?;

        tracing::info!(obra_social_id, "Obra social creada");
        Ok(obra_social_id)
    }

    /// Actualiza una obra social y audita campo por campo qué cambió.
    pub async fn actualizar_obra_social(
        &self,
        obra_social_id: i32,
        cambios: NuevaObraSocial,
    ) -> Result<(), AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let anterior = self
            .repo
            .obtener_por_id(&mut *tx, obra_social_id)
            .await?
            .ok_or(AppError::NoEncontrado("Obra social"))?;

        self.repo
            .actualizar_obra_social(&mut *tx, obra_social_id, &cambios)
            .await?;

        let detalle = detalle_de_cambios(&anterior, &cambios);
        self.repo
            .registrar_auditoria(
                &mut *tx,
                obra_social_id,
                "ACTUALIZAR",
                &detalle,
                cambios.usuario_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(obra_social_id, "Obra social actualizada");
        Ok(())
    }

    /// Borrado lógico con auditoría.
    pub async fn eliminar_obra_social(
        &self,
        obra_social_id: i32,
        usuario_id: Option<i32>,
    ) -> Result<(), AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let filas = self.repo.eliminar_obra_social(&mut *tx, obra_social_id).await?;
        if filas == 0 {
            return Err(AppError::NoEncontrado("Obra social"));
        }

        self.repo
            .registrar_auditoria(
                &mut *tx,
                obra_social_id,
                "ELIMINAR",
                "Obra social eliminada",
                usuario_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(obra_social_id, "Obra social eliminada");
        Ok(())
    }
}

/// Describe los cambios entre la obra social guardada y los datos
/// nuevos, un campo por cláusula, separados por "; ".
fn detalle_de_cambios(anterior: &ObraSocial, cambios: &NuevaObraSocial) -> String {
    let mut partes = Vec::new();

    if anterior.obra_social != cambios.obra_social {
        partes.push(format!(
            "Obra social: '{}' -> '{}'",
            anterior.obra_social, cambios.obra_social
        ));
    }
    if anterior.plan != cambios.plan {
        partes.push(format!(
            "Plan: '{}' -> '{}'",
            anterior.plan.as_deref().unwrap_or("-"),
            cambios.plan.as_deref().unwrap_or("-"),
        ));
    }

    let descuento_nuevo = cambios.descuento.and_then(Decimal::from_f64);
    if anterior.descuento != descuento_nuevo {
        partes.push(format!(
            "Descuento: {} -> {}",
            anterior
                .descuento
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            descuento_nuevo
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ));
    }
    if anterior.codigo != cambios.codigo {
        partes.push(format!(
            "Código: '{}' -> '{}'",
            anterior.codigo.as_deref().unwrap_or("-"),
            cambios.codigo.as_deref().unwrap_or("-"),
        ));
    }

    if partes.is_empty() {
        "Sin cambios".to_string()
    } else {
        partes.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obra_base() -> ObraSocial {
        ObraSocial {
            obra_social_id: 1,
            obra_social: "OSDE".to_string(),
            plan: Some("210".to_string()),
            descuento: Some(Decimal::from(40)),
            codigo: Some("OS-210".to_string()),
        }
    }

    fn cambios_identicos() -> NuevaObraSocial {
        NuevaObraSocial {
            obra_social: "OSDE".to_string(),
            plan: Some("210".to_string()),
            descuento: Some(40.0),
            codigo: Some("OS-210".to_string()),
            usuario_id: None,
        }
    }

    #[test]
    fn sin_cambios_se_deja_constancia() {
        let detalle = detalle_de_cambios(&obra_base(), &cambios_identicos());
        assert_eq!(detalle, "Sin cambios");
    }

    #[test]
    fn cada_campo_modificado_aparece_en_el_detalle() {
        let mut cambios = cambios_identicos();
        cambios.plan = Some("310".to_string());
        cambios.descuento = Some(50.0);

        let detalle = detalle_de_cambios(&obra_base(), &cambios);
        assert_eq!(detalle, "Plan: '210' -> '310'; Descuento: 40 -> 50");
    }

    #[test]
    fn codigo_ausente_se_muestra_como_guion() {
        let mut cambios = cambios_identicos();
        cambios.codigo = None;

        let detalle = detalle_de_cambios(&obra_base(), &cambios);
        assert_eq!(detalle, "Código: 'OS-210' -> '-'");
    }
}
