// src/models/obras_sociales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// Obra social (plan de cobertura de salud) con su porcentaje de descuento.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ObraSocial {
    pub obra_social_id: i32,
    pub obra_social: String,
    pub plan: Option<String>,
    pub descuento: Option<Decimal>,
    pub codigo: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NuevaObraSocial {
    #[validate(length(min = 1, message = "El nombre de la obra social es obligatorio."))]
    pub obra_social: String,
    pub plan: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "El descuento debe estar entre 0 y 100."))]
    pub descuento: Option<f64>,
    pub codigo: Option<String>,
    pub usuario_id: Option<i32>,
}

// Registro de auditoría de obras sociales (CREAR / ACTUALIZAR / ELIMINAR).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditoriaObraSocial {
    pub auditoria_id: i32,
    pub obra_social_id: Option<i32>,
    pub accion: String,
    pub detalle_cambio: Option<String>,
    pub fecha_movimiento: DateTime<Utc>,
    pub usuario_id: Option<i32>,
}

// --- Liquidación ---
//
// Reporte de liquidación: las ventas del período agrupadas por obra
// social, con el aporte que le corresponde a cada una según su
// porcentaje de descuento y lo que queda a cargo del paciente.

#[derive(Debug, Clone, Deserialize)]
pub struct FiltrosLiquidacion {
    #[serde(rename = "obraSocialId")]
    pub obra_social_id: Option<i32>,
    #[serde(rename = "fechaDesde")]
    pub fecha_desde: Option<String>,
    #[serde(rename = "fechaHasta")]
    pub fecha_hasta: Option<String>,
    #[serde(rename = "incluirSinObraSocial", default)]
    pub incluir_sin_obra_social: bool,
}

// Una venta con su obra social resuelta, tal como sale de la consulta.
#[derive(Debug, Clone, FromRow)]
pub struct VentaLiquidacion {
    pub venta_id: i32,
    pub fecha_hora: DateTime<Utc>,
    pub numero_factura: Option<String>,
    pub subtotal: Option<Decimal>,
    pub descuento: Option<Decimal>,
    pub total: Decimal,
    pub cliente_nombre: String,
    pub cliente_apellido: String,
    pub cliente_dni: Option<String>,
    pub obra_social_id: Option<i32>,
    pub obra_social: String,
    pub plan: Option<String>,
    pub descuento_obra_social: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClienteLiquidacion {
    pub nombre: String,
    pub apellido: String,
    pub dni: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetalleLiquidacion {
    pub venta_id: i32,
    pub fecha: DateTime<Utc>,
    pub numero_factura: Option<String>,
    pub subtotal: Decimal,
    pub descuento_porcentaje: Decimal,
    pub aporte_obra_social: Decimal,
    pub total_paciente: Decimal,
    pub cliente: ClienteLiquidacion,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrupoLiquidacion {
    pub obra_social_id: Option<i32>,
    pub obra_social: String,
    pub cantidad_ventas: usize,
    pub subtotal_total: Decimal,
    pub aporte_obra_social: Decimal,
    pub total_paciente: Decimal,
    pub detalle: Vec<DetalleLiquidacion>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TotalesLiquidacion {
    pub cantidad_ventas: usize,
    pub subtotal_total: Decimal,
    pub descuento_total: Decimal,
    pub aporte_obra_social: Decimal,
    pub total_paciente: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultadoLiquidacion {
    pub resumen: Vec<GrupoLiquidacion>,
    pub totales: TotalesLiquidacion,
    pub total_registros: usize,
}
