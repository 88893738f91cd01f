// src/models/productos.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// Fila del catálogo de productos, con su categoría resuelta.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Producto {
    pub producto_id: i32,
    pub nombre: String,
    pub codigo: String,
    pub marca: Option<String>,
    pub categoria_id: Option<i32>,
    pub categoria_nombre: Option<String>,
    pub stock: i32,
    pub precio: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Categoria {
    pub categoria_id: i32,
    pub nombre: String,
}

// Categorías + marcas distintas, para poblar los filtros del frontend.
#[derive(Debug, Clone, Serialize)]
pub struct FiltrosProductos {
    pub categorias: Vec<Categoria>,
    pub marcas: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NuevoProducto {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,
    #[validate(length(min = 1, message = "El código es obligatorio."))]
    pub codigo: String,
    pub marca: Option<String>,
    pub categoria_id: Option<i32>,
    #[validate(range(min = 0, message = "El stock no puede ser negativo."))]
    pub stock: i32,
    pub precio: Option<Decimal>,
    pub usuario_id: Option<i32>,
}

// Registro de auditoría de productos (CREAR / ACTUALIZAR / ELIMINAR).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditoriaProducto {
    pub auditoria_id: i32,
    pub producto_id: Option<i32>,
    pub accion: String,
    pub detalle_cambio: Option<String>,
    pub fecha_movimiento: DateTime<Utc>,
    pub usuario_id: Option<i32>,
}
