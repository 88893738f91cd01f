// src/services/liquidacion_service.rs
//
// Liquidación de obras sociales: agrupa las ventas del período por
// obra social y calcula cuánto le corresponde aportar a cada una
// según su porcentaje de descuento, y cuánto queda a cargo del
// paciente.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::ObrasSocialesRepository,
    models::obras_sociales::{
        ClienteLiquidacion, DetalleLiquidacion, FiltrosLiquidacion, GrupoLiquidacion,
        ResultadoLiquidacion, TotalesLiquidacion, VentaLiquidacion,
    },
};

#[derive(Clone)]
pub struct LiquidacionService {
    repo: ObrasSocialesRepository,
}

impl LiquidacionService {
    pub fn new(repo: ObrasSocialesRepository) -> Self {
        Self { repo }
    }

    pub async fn generar_liquidacion(
        &self,
        filtros: FiltrosLiquidacion,
    ) -> Result<ResultadoLiquidacion, AppError> {
        // Al filtrar por una obra social entran todos sus planes: los
        // ids que comparten nombre liquidan juntos.
        let ids = match filtros.obra_social_id {
            Some(id) => {
                let ids = self.repo.ids_con_mismo_nombre(id).await?;
                if ids.is_empty() { None } else { Some(ids) }
            }
            None => None,
        };

        let ventas = self
            .repo
            .ventas_para_liquidacion(
                filtros.fecha_desde.as_deref(),
                filtros.fecha_hasta.as_deref(),
                ids.as_deref(),
                filtros.incluir_sin_obra_social,
            )
            .await?;

        Ok(agrupar_liquidacion(ventas))
    }
}

/// Clave de agrupación: la misma obra social suele estar cargada con
/// variantes de escritura ("Swiss Medical" / "Swissmedical"), se
/// unifican ignorando mayúsculas, espacios y signos.
fn normalizar_nombre(nombre: &str) -> String {
    nombre
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn agrupar_liquidacion(ventas: Vec<VentaLiquidacion>) -> ResultadoLiquidacion {
    let mut grupos: Vec<GrupoLiquidacion> = Vec::new();
    let mut indice: HashMap<String, usize> = HashMap::new();
    let mut totales = TotalesLiquidacion::default();
    let total_registros = ventas.len();

    for venta in ventas {
        let subtotal = venta.subtotal.unwrap_or(Decimal::ZERO);
        let descuento = venta.descuento.unwrap_or(Decimal::ZERO);

        let descuento_porcentaje = if subtotal > Decimal::ZERO {
            (descuento / subtotal * Decimal::from(100)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        // Sólo aporta la obra social si la venta tiene una asociada y
        // esa obra social tiene descuento cargado.
        let aporte = if venta.obra_social_id.is_some()
            && venta.descuento_obra_social > Decimal::ZERO
        {
            (venta.total * venta.descuento_obra_social / Decimal::from(100)).round_dp(2)
        } else {
            Decimal::ZERO
        };
        let total_paciente = venta.total - aporte;

        let nombre_mostrado = venta.obra_social.split_whitespace().collect::<Vec<_>>().join(" ");
        let clave = normalizar_nombre(&nombre_mostrado);

        let posicion = match indice.get(&clave) {
            Some(posicion) => *posicion,
            None => {
                grupos.push(GrupoLiquidacion {
                    obra_social_id: venta.obra_social_id,
                    obra_social: nombre_mostrado,
                    cantidad_ventas: 0,
                    subtotal_total: Decimal::ZERO,
                    aporte_obra_social: Decimal::ZERO,
                    total_paciente: Decimal::ZERO,
                    detalle: Vec::new(),
                });
                indice.insert(clave, grupos.len() - 1);
                grupos.len() - 1
            }
        };

        let grupo = &mut grupos[posicion];
        grupo.cantidad_ventas += 1;
        grupo.subtotal_total += subtotal;
        grupo.aporte_obra_social += aporte;
        grupo.total_paciente += total_paciente;
        grupo.detalle.push(DetalleLiquidacion {
            venta_id: venta.venta_id,
            fecha: venta.fecha_hora,
            numero_factura: venta.numero_factura,
            subtotal,
            descuento_porcentaje,
            aporte_obra_social: aporte,
            total_paciente,
            cliente: ClienteLiquidacion {
                nombre: venta.cliente_nombre,
                apellido: venta.cliente_apellido,
                dni: venta.cliente_dni,
            },
        });

        totales.cantidad_ventas += 1;
        totales.subtotal_total += subtotal;
        totales.descuento_total += descuento;
        totales.aporte_obra_social += aporte;
        totales.total_paciente += total_paciente;
    }

    ResultadoLiquidacion {
        resumen: grupos,
        totales,
        total_registros,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn venta(
        venta_id: i32,
        obra_social_id: Option<i32>,
        obra_social: &str,
        descuento_os: i64,
        total: i64,
    ) -> VentaLiquidacion {
        VentaLiquidacion {
            venta_id,
            fecha_hora: Utc::now(),
            numero_factura: Some(format!("{venta_id:09}")),
            subtotal: Some(Decimal::from(total)),
            descuento: Some(Decimal::ZERO),
            total: Decimal::from(total),
            cliente_nombre: "María".to_string(),
            cliente_apellido: "González".to_string(),
            cliente_dni: Some("30123456".to_string()),
            obra_social_id,
            obra_social: obra_social.to_string(),
            plan: None,
            descuento_obra_social: Decimal::from(descuento_os),
        }
    }

    #[test]
    fn nombres_equivalentes_quedan_en_el_mismo_grupo() {
        assert_eq!(normalizar_nombre("Swiss Medical"), "swissmedical");
        assert_eq!(normalizar_nombre("Swissmedical"), "swissmedical");
        assert_eq!(normalizar_nombre("  SWISS   MEDICAL! "), "swissmedical");

        let resultado = agrupar_liquidacion(vec![
            venta(1, Some(1), "Swiss Medical", 40, 1_000),
            venta(2, Some(2), "Swissmedical", 40, 2_000),
        ]);

        assert_eq!(resultado.resumen.len(), 1);
        let grupo = &resultado.resumen[0];
        assert_eq!(grupo.obra_social, "Swiss Medical");
        assert_eq!(grupo.cantidad_ventas, 2);
        assert_eq!(grupo.detalle.len(), 2);
    }

    #[test]
    fn aporte_segun_descuento_de_la_obra_social() {
        // 40% de $1.000 = $400 de aporte, $600 a cargo del paciente.
        let resultado = agrupar_liquidacion(vec![venta(1, Some(1), "OSDE", 40, 1_000)]);

        let detalle = &resultado.resumen[0].detalle[0];
        assert_eq!(detalle.aporte_obra_social, Decimal::from(400));
        assert_eq!(detalle.total_paciente, Decimal::from(600));
    }

    #[test]
    fn sin_obra_social_no_hay_aporte() {
        let resultado =
            agrupar_liquidacion(vec![venta(1, None, "Sin obra social", 0, 1_500)]);

        let grupo = &resultado.resumen[0];
        assert_eq!(grupo.obra_social, "Sin obra social");
        assert_eq!(grupo.aporte_obra_social, Decimal::ZERO);
        assert_eq!(grupo.total_paciente, Decimal::from(1_500));
    }

    #[test]
    fn los_totales_generales_suman_todos_los_grupos() {
        let resultado = agrupar_liquidacion(vec![
            venta(1, Some(1), "OSDE", 40, 1_000),
            venta(2, Some(2), "PAMI", 50, 2_000),
            venta(3, None, "Sin obra social", 0, 500),
        ]);

        assert_eq!(resultado.resumen.len(), 3);
        assert_eq!(resultado.total_registros, 3);

        let t = &resultado.totales;
        assert_eq!(t.cantidad_ventas, 3);
        assert_eq!(t.subtotal_total, Decimal::from(3_500));
        // 400 + 1000 + 0
        assert_eq!(t.aporte_obra_social, Decimal::from(1_400));
        // 600 + 1000 + 500
        assert_eq!(t.total_paciente, Decimal::from(2_100));
    }

    #[test]
    fn porcentaje_de_descuento_guarda_dos_decimales() {
        let mut con_descuento = venta(1, Some(1), "OSDE", 0, 900);
        con_descuento.subtotal = Some(Decimal::from(1_000));
        con_descuento.descuento = Some(Decimal::from(100));

        let resultado = agrupar_liquidacion(vec![con_descuento]);
        let detalle = &resultado.resumen[0].detalle[0];
        assert_eq!(detalle.descuento_porcentaje, Decimal::new(1_000, 2)); // 10.00

        let mut sin_subtotal = venta(2, Some(1), "OSDE", 0, 900);
        sin_subtotal.subtotal = None;
        let resultado = agrupar_liquidacion(vec![sin_subtotal]);
        assert_eq!(
            resultado.resumen[0].detalle[0].descuento_porcentaje,
            Decimal::ZERO
        );
    }
}
