// src/db/vencimientos_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::vencimientos::{
        LoteProximo, ProductoAltoRiesgo, ProductoProblematico, VentasHistoricas,
    },
};

/// Capacidad de acceso a datos que necesita el analizador de vencimientos.
///
/// Es un trait para poder inyectar un fake en memoria en los tests:
/// el servicio nunca toca el pool directamente.
#[async_trait]
pub trait VencimientosRepo: Send + Sync {
    /// Lotes vigentes (no borrados, con stock) que vencen dentro de
    /// `dias_anticipacion` días, ordenados por fecha de vencimiento
    /// ascendente. El corte se resuelve contra CURRENT_DATE, la misma
    /// referencia que usa dias_restantes.
    async fn lotes_proximos_a_vencer(
        &self,
        dias_anticipacion: i64,
    ) -> Result<Vec<LoteProximo>, AppError>;

    /// Unidades vendidas y cantidad de ventas de un producto en la
    /// ventana móvil de `ventana_dias` días.
    async fn ventas_historicas(
        &self,
        producto_id: i32,
        ventana_dias: i64,
    ) -> Result<VentasHistoricas, AppError>;

    /// Productos con 2 o más lotes vencidos con stock remanente,
    /// rankeados por ocurrencias y pérdida promedio (top 20).
    async fn productos_problematicos(&self) -> Result<Vec<ProductoProblematico>, AppError>;

    /// Productos con stock > 50 cuyas ventas de 90 días no llegan al 30%
    /// del stock, rankeados por ratio stock/venta (top 20).
    async fn productos_alto_riesgo(&self) -> Result<Vec<ProductoAltoRiesgo>, AppError>;
}

#[derive(Clone)]
pub struct PgVencimientosRepo {
    pool: PgPool,
}

impl PgVencimientosRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VencimientosRepo for PgVencimientosRepo {
    async fn lotes_proximos_a_vencer(
        &self,
        dias_anticipacion: i64,
    ) -> Result<Vec<LoteProximo>, AppError> {
        let lotes = sqlx::query_as::<_, LoteProximo>(
            r#"
            SELECT
                l.lote_id,
                l.numero_lote,
                l.producto_id,
                p.nombre AS producto_nombre,
                p.codigo AS producto_codigo,
                p.marca,
                c.nombre AS categoria_nombre,
                l.fecha_vencimiento,
                (l.fecha_vencimiento - CURRENT_DATE)::INT AS dias_restantes,
                l.cantidad_actual,
                l.precio_compra,
                l.precio_venta,
                l.cantidad_actual * COALESCE(l.precio_compra, 0) AS valor_inventario,
                pr.razon_social AS proveedor_nombre
            FROM lotes l
            JOIN productos p ON l.producto_id = p.producto_id
            LEFT JOIN categorias c ON p.categoria_id = c.categoria_id
            LEFT JOIN proveedores pr ON p.proveedor_id = pr.proveedor_id
            WHERE l.deleted_at IS NULL
              AND l.cantidad_actual > 0
              AND l.fecha_vencimiento <= CURRENT_DATE + $1::INT
            ORDER BY l.fecha_vencimiento ASC
            "#,
        )
        .bind(dias_anticipacion as i32)
        .fetch_all(&self.pool)
        .await?;

        Ok(lotes)
    }

    async fn ventas_historicas(
        &self,
        producto_id: i32,
        ventana_dias: i64,
    ) -> Result<VentasHistoricas, AppError> {
        let ventas = sqlx::query_as::<_, VentasHistoricas>(
            r#"
            SELECT
                COALESCE(SUM(iv.cantidad), 0)::BIGINT AS total_vendido,
                COUNT(DISTINCT v.venta_id) AS cantidad_ventas
            FROM items_venta iv
            JOIN ventas v ON iv.venta_id = v.venta_id
            WHERE iv.producto_id = $1
              AND v.fecha_hora >= CURRENT_DATE - $2::INT
            "#,
        )
        .bind(producto_id)
        .bind(ventana_dias as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(ventas)
    }

    async fn productos_problematicos(&self) -> Result<Vec<ProductoProblematico>, AppError> {
        let productos = sqlx::query_as::<_, ProductoProblematico>(
            r#"
            SELECT
                p.producto_id,
                p.nombre,
                COUNT(*) AS veces_vencido,
                AVG(l.cantidad_actual * COALESCE(l.precio_compra, 0)) AS perdida_promedio
            FROM lotes l
            JOIN productos p ON l.producto_id = p.producto_id
            WHERE l.deleted_at IS NULL
              AND l.fecha_vencimiento < CURRENT_DATE
              AND l.cantidad_actual > 0
            GROUP BY p.producto_id, p.nombre
            HAVING COUNT(*) >= 2
            ORDER BY veces_vencido DESC, perdida_promedio DESC
            LIMIT 20
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }

    async fn productos_alto_riesgo(&self) -> Result<Vec<ProductoAltoRiesgo>, AppError> {
        let productos = sqlx::query_as::<_, ProductoAltoRiesgo>(
            r#"
            SELECT
                p.producto_id,
                p.nombre,
                p.stock,
                COALESCE(SUM(iv.cantidad), 0)::BIGINT AS unidades_vendidas_90dias,
                p.stock::DECIMAL / NULLIF(SUM(iv.cantidad), 0) AS ratio_stock_venta
            FROM productos p
            LEFT JOIN items_venta iv ON p.producto_id = iv.producto_id
                AND iv.created_at >= CURRENT_DATE - INTERVAL '90 days'
            WHERE p.deleted_at IS NULL
              AND p.stock > 50
            GROUP BY p.producto_id, p.nombre, p.stock
            HAVING COALESCE(SUM(iv.cantidad), 0) < p.stock * 0.3
            ORDER BY ratio_stock_venta DESC NULLS LAST
            LIMIT 20
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }
}
