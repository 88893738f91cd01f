// src/models/lotes.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// Un lote con los datos de producto y proveedor ya resueltos,
// tal como lo consume el listado de inventario.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Lote {
    pub lote_id: i32,
    pub numero_lote: String,
    pub fecha_vencimiento: NaiveDate,
    pub fecha_fabricacion: Option<NaiveDate>,
    pub cantidad_inicial: i32,
    pub cantidad_actual: i32,
    pub precio_compra: Option<Decimal>,
    pub precio_venta: Option<Decimal>,
    pub estado: String,
    pub fecha_entrada: DateTime<Utc>,
    pub ubicacion: Option<String>,
    pub producto_id: i32,
    pub producto_nombre: String,
    pub producto_codigo: String,
    pub proveedor_id: Option<i32>,
    pub proveedor_nombre: Option<String>,
    pub dias_hasta_vencimiento: i32,
}

// Movimiento del kardex de un lote (ENTRADA / SALIDA / AJUSTE).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovimientoLote {
    pub movimiento_id: i32,
    pub lote_id: i32,
    pub tipo_movimiento: String,
    pub cantidad: i32,
    pub cantidad_anterior: i32,
    pub cantidad_nueva: i32,
    pub motivo: Option<String>,
    pub referencia_tipo: Option<String>,
    pub referencia_id: Option<i32>,
    pub usuario_id: Option<i32>,
    pub usuario_nombre: Option<String>,
    pub fecha_movimiento: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NuevoLote {
    pub producto_id: i32,
    #[validate(length(min = 1, message = "El número de lote es obligatorio."))]
    pub numero_lote: String,
    pub fecha_vencimiento: NaiveDate,
    pub fecha_fabricacion: Option<NaiveDate>,
    #[validate(range(min = 1, message = "La cantidad inicial debe ser mayor a cero."))]
    pub cantidad_inicial: i32,
    pub cantidad_actual: Option<i32>,
    pub precio_compra: Option<Decimal>,
    pub precio_venta: Option<Decimal>,
    pub proveedor_id: Option<i32>,
    pub ubicacion: Option<String>,
    pub observaciones: Option<String>,
    pub usuario_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AjusteCantidadLote {
    #[validate(range(min = 0, message = "Cantidad inválida"))]
    pub nueva_cantidad: i32,
    pub motivo: Option<String>,
    pub referencia_tipo: Option<String>,
    pub referencia_id: Option<i32>,
    pub usuario_id: Option<i32>,
}

// Resultado de un ajuste de cantidad, con el antes y el después.
#[derive(Debug, Clone, Serialize)]
pub struct ResultadoAjuste {
    pub cantidad_anterior: i32,
    pub cantidad_nueva: i32,
}
