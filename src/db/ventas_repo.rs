// src/db/ventas_repo.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::ventas::{FiltrosVentas, ItemVenta, NuevoItemVenta, Venta, VentaConItems},
};

#[derive(Clone)]
pub struct VentasRepository {
    pool: PgPool,
}

impl VentasRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Listado paginado con filtros opcionales. Los items de cada venta
    /// se buscan en una segunda consulta por lote de venta_ids.
    pub async fn obtener_ventas(
        &self,
        filtros: &FiltrosVentas,
    ) -> Result<Vec<VentaConItems>, AppError> {
        let page = filtros.page.unwrap_or(1).max(1);
        let page_size = filtros.page_size.unwrap_or(20).clamp(1, 100);

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT
                v.venta_id,
                v.fecha_hora,
                v.numero_factura,
                cl.nombre AS cliente_nombre,
                cl.apellido AS cliente_apellido,
                u.nombre AS usuario_nombre,
                u.apellido AS usuario_apellido,
                v.total,
                v.total_sin_descuento,
                v.descuento
            FROM ventas v
            LEFT JOIN clientes cl ON cl.cliente_id = v.cliente_id
            LEFT JOIN usuarios u ON u.usuario_id = v.usuario_id
            WHERE 1=1
            "#,
        );

        if let Some(search) = filtros.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let patron = format!("%{}%", search.trim());
            builder.push(" AND (cl.nombre ILIKE ");
            builder.push_bind(patron.clone());
            builder.push(" OR cl.apellido ILIKE ");
            builder.push_bind(patron.clone());
            builder.push(" OR v.numero_factura ILIKE ");
            builder.push_bind(patron);
            builder.push(")");
        }

        if let Some(desde) = filtros.fecha_desde.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND v.fecha_hora >= ");
            builder.push_bind(desde.to_string());
            builder.push("::timestamptz");
        }

        if let Some(hasta) = filtros.fecha_hasta.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND v.fecha_hora < ");
            builder.push_bind(hasta.to_string());
            builder.push("::timestamptz + INTERVAL '1 day'");
        }

        if let Some(numero) = filtros.numero_factura.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND v.numero_factura ILIKE ");
            builder.push_bind(format!("%{numero}%"));
        }

        if let Some(cliente_id) = filtros.cliente_id {
            builder.push(" AND v.cliente_id = ");
            builder.push_bind(cliente_id);
        }

        builder.push(" ORDER BY v.fecha_hora DESC LIMIT ");
        builder.push_bind(page_size);
        builder.push(" OFFSET ");
        builder.push_bind((page - 1) * page_size);

        let ventas = builder
            .build_query_as::<Venta>()
            .fetch_all(&self.pool)
            .await?;

        self.adjuntar_items(ventas).await
    }

    pub async fn obtener_por_id(&self, venta_id: i32) -> Result<Option<VentaConItems>, AppError> {
        let venta = sqlx::query_as::<_, Venta>(
            r#"
            SELECT
                v.venta_id, v.fecha_hora, v.numero_factura,
                cl.nombre AS cliente_nombre, cl.apellido AS cliente_apellido,
                u.nombre AS usuario_nombre, u.apellido AS usuario_apellido,
                v.total, v.total_sin_descuento, v.descuento
            FROM ventas v
            LEFT JOIN clientes cl ON cl.cliente_id = v.cliente_id
            LEFT JOIN usuarios u ON u.usuario_id = v.usuario_id
            WHERE v.venta_id = $1
            "#,
        )
        .bind(venta_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(venta) = venta else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ItemVenta>(
            r#"
            SELECT iv.venta_id, iv.producto_id, p.nombre AS producto_nombre,
                   iv.cantidad, iv.precio_unitario, iv.total_item
            FROM items_venta iv
            JOIN productos p ON p.producto_id = iv.producto_id
            WHERE iv.venta_id = $1
            ORDER BY iv.producto_id
            "#,
        )
        .bind(venta_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(VentaConItems { venta, items }))
    }

    /// Últimas diez compras de un cliente, para la ficha del cliente.
    pub async fn ultimas_ventas_cliente(
        &self,
        cliente_id: i32,
    ) -> Result<Vec<VentaConItems>, AppError> {
        let ventas = sqlx::query_as::<_, Venta>(
            r#"
            SELECT
                v.venta_id, v.fecha_hora, v.numero_factura,
                cl.nombre AS cliente_nombre, cl.apellido AS cliente_apellido,
                u.nombre AS usuario_nombre, u.apellido AS usuario_apellido,
                v.total, v.total_sin_descuento, v.descuento
            FROM ventas v
            LEFT JOIN clientes cl ON cl.cliente_id = v.cliente_id
            LEFT JOIN usuarios u ON u.usuario_id = v.usuario_id
            WHERE v.cliente_id = $1
            ORDER BY v.fecha_hora DESC
            LIMIT 10
            "#,
        )
        .bind(cliente_id)
        .fetch_all(&self.pool)
        .await?;

        self.adjuntar_items(ventas).await
    }

    pub async fn insertar_venta<'e, E>(
        &self,
        executor: E,
        cliente_id: i32,
        usuario_id: i32,
        fecha_hora: DateTime<Utc>,
        total: Decimal,
        total_sin_descuento: Option<Decimal>,
        descuento: Option<Decimal>,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (venta_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO ventas (cliente_id, usuario_id, fecha_hora, total, total_sin_descuento, descuento)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING venta_id
            "#,
        )
        .bind(cliente_id)
        .bind(usuario_id)
        .bind(fecha_hora)
        .bind(total)
        .bind(total_sin_descuento)
        .bind(descuento)
        .fetch_one(executor)
        .await?;

        Ok(venta_id)
    }

    pub async fn asignar_numero_factura<'e, E>(
        &self,
        executor: E,
        venta_id: i32,
        numero_factura: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE ventas SET numero_factura = $1 WHERE venta_id = $2")
            .bind(numero_factura)
            .bind(venta_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn insertar_item<'e, E>(
        &self,
        executor: E,
        venta_id: i32,
        item: &NuevoItemVenta,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO items_venta (venta_id, producto_id, cantidad, precio_unitario, total_item)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(venta_id)
        .bind(item.producto_id)
        .bind(item.cantidad)
        .bind(item.precio_unitario)
        .bind(item.total_item)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Lee el stock actual con FOR UPDATE para serializar ventas
    /// concurrentes sobre el mismo producto.
    pub async fn stock_para_venta<'e, E>(
        &self,
        executor: E,
        producto_id: i32,
    ) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT stock FROM productos WHERE producto_id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(producto_id)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(|(stock,)| stock))
    }

    pub async fn descontar_stock<'e, E>(
        &self,
        executor: E,
        producto_id: i32,
        cantidad: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE productos SET stock = stock - $1, updated_at = CURRENT_TIMESTAMP WHERE producto_id = $2",
        )
        .bind(cantidad)
        .bind(producto_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    async fn adjuntar_items(
        &self,
        ventas: Vec<Venta>,
    ) -> Result<Vec<VentaConItems>, AppError> {
        if ventas.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = ventas.iter().map(|v| v.venta_id).collect();

        let items = sqlx::query_as::<_, ItemVenta>(
            r#"
            SELECT iv.venta_id, iv.producto_id, p.nombre AS producto_nombre,
                   iv.cantidad, iv.precio_unitario, iv.total_item
            FROM items_venta iv
            JOIN productos p ON p.producto_id = iv.producto_id
            WHERE iv.venta_id = ANY($1)
            ORDER BY iv.venta_id, iv.producto_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut por_venta: HashMap<i32, Vec<ItemVenta>> = HashMap::new();
        for item in items {
            por_venta.entry(item.venta_id).or_default().push(item);
        }

        Ok(ventas
            .into_iter()
            .map(|venta| {
                let items = por_venta.remove(&venta.venta_id).unwrap_or_default();
                VentaConItems { venta, items }
            })
            .collect())
    }
}
