// src/models/ventas.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// Cabecera de una venta, con cliente y vendedor resueltos.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Venta {
    pub venta_id: i32,
    pub fecha_hora: DateTime<Utc>,
    pub numero_factura: Option<String>,
    pub cliente_nombre: Option<String>,
    pub cliente_apellido: Option<String>,
    pub usuario_nombre: Option<String>,
    pub usuario_apellido: Option<String>,
    pub total: Decimal,
    pub total_sin_descuento: Option<Decimal>,
    pub descuento: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ItemVenta {
    pub venta_id: i32,
    pub producto_id: i32,
    pub producto_nombre: String,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub total_item: Decimal,
}

// Venta + items, la forma que espera el listado.
#[derive(Debug, Clone, Serialize)]
pub struct VentaConItems {
    #[serde(flatten)]
    pub venta: Venta,
    pub items: Vec<ItemVenta>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NuevaVenta {
    pub cliente_id: i32,
    pub usuario_id: i32,
    pub fecha_hora: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub total_sin_descuento: Option<Decimal>,
    pub descuento: Option<Decimal>,
    pub numero_factura: Option<i64>,
    #[validate(nested)]
    #[validate(length(min = 1, message = "La venta debe tener al menos un item."))]
    pub items: Vec<NuevoItemVenta>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NuevoItemVenta {
    pub producto_id: i32,
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a cero."))]
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub total_item: Decimal,
}

// Filtros del listado de ventas.
#[derive(Debug, Deserialize, Default)]
pub struct FiltrosVentas {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    pub search: Option<String>,
    #[serde(rename = "fechaDesde")]
    pub fecha_desde: Option<String>,
    #[serde(rename = "fechaHasta")]
    pub fecha_hasta: Option<String>,
    #[serde(rename = "numeroFactura")]
    pub numero_factura: Option<String>,
    #[serde(rename = "clienteId")]
    pub cliente_id: Option<i32>,
}
