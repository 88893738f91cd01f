// src/db/productos_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::productos::{AuditoriaProducto, Categoria, NuevoProducto, Producto},
};

#[derive(Clone)]
pub struct ProductosRepository {
    pool: PgPool,
}

impl ProductosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pool subyacente, para que el servicio arme sus propias transacciones.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn obtener_productos(
        &self,
        page: i64,
        page_size: i64,
        search: &str,
    ) -> Result<Vec<Producto>, AppError> {
        let offset = (page - 1).max(0) * page_size;
        let patron = if search.trim().is_empty() {
            "%".to_string()
        } else {
            format!("%{}%", search.trim())
        };

        let productos = sqlx::query_as::<_, Producto>(
            r#"
            SELECT
                p.producto_id,
                p.nombre,
                p.codigo,
                p.marca,
                c.categoria_id,
                c.nombre AS categoria_nombre,
                p.stock,
                p.precio
            FROM productos p
            LEFT JOIN categorias c ON c.categoria_id = p.categoria_id
            WHERE p.deleted_at IS NULL
              AND (p.nombre ILIKE $1 OR p.codigo ILIKE $1 OR p.marca ILIKE $1)
            ORDER BY p.nombre ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(patron)
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }

    pub async fn obtener_por_id<'e, E>(
        &self,
        executor: E,
        producto_id: i32,
    ) -> Result<Option<Producto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let producto = sqlx::query_as::<_, Producto>(
            r#"
            SELECT
                p.producto_id, p.nombre, p.codigo, p.marca,
                c.categoria_id, c.nombre AS categoria_nombre,
                p.stock, p.precio
            FROM productos p
            LEFT JOIN categorias c ON c.categoria_id = p.categoria_id
            WHERE p.producto_id = $1 AND p.deleted_at IS NULL
            "#,
        )
        .bind(producto_id)
        .fetch_optional(executor)
        .await?;

        Ok(producto)
    }

    pub async fn agregar_producto<'e, E>(
        &self,
        executor: E,
        nuevo: &NuevoProducto,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (producto_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO productos (nombre, codigo, marca, categoria_id, stock, precio)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING producto_id
            "#,
        )
        .bind(&nuevo.nombre)
        .bind(&nuevo.codigo)
        .bind(&nuevo.marca)
        .bind(nuevo.categoria_id)
        .bind(nuevo.stock)
        .bind(nuevo.precio)
        .fetch_one(executor)
        .await?;

        Ok(producto_id)
    }

    pub async fn actualizar_producto<'e, E>(
        &self,
        executor: E,
        producto_id: i32,
        producto: &NuevoProducto,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE productos
            SET nombre = $1, codigo = $2, marca = $3, categoria_id = $4,
                stock = $5, precio = $6, updated_at = CURRENT_TIMESTAMP
            WHERE producto_id = $7
            "#,
        )
        .bind(&producto.nombre)
        .bind(&producto.codigo)
        .bind(&producto.marca)
        .bind(producto.categoria_id)
        .bind(producto.stock)
        .bind(producto.precio)
        .bind(producto_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Borrado lógico: sólo marca deleted_at, los lotes y ventas
    /// históricas del producto siguen consultables.
    pub async fn eliminar_producto<'e, E>(
        &self,
        executor: E,
        producto_id: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE productos SET deleted_at = NOW() WHERE producto_id = $1 AND deleted_at IS NULL",
        )
        .bind(producto_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn obtener_categorias(&self) -> Result<Vec<Categoria>, AppError> {
        let categorias = sqlx::query_as::<_, Categoria>(
            "SELECT categoria_id, nombre FROM categorias ORDER BY nombre",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categorias)
    }

    pub async fn obtener_marcas(&self) -> Result<Vec<String>, AppError> {
        let marcas: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT marca FROM productos
            WHERE marca IS NOT NULL AND marca != '' AND deleted_at IS NULL
            ORDER BY marca
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(marcas.into_iter().map(|(m,)| m).collect())
    }

    pub async fn obtener_auditoria(
        &self,
        producto_id: i32,
    ) -> Result<Vec<AuditoriaProducto>, AppError> {
        let auditoria = sqlx::query_as::<_, AuditoriaProducto>(
            r#"
            SELECT auditoria_id, producto_id, accion, detalle_cambio, fecha_movimiento, usuario_id
            FROM auditoria_productos
            WHERE producto_id = $1
            ORDER BY fecha_movimiento DESC
            "#,
        )
        .bind(producto_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(auditoria)
    }

    /// Registra una fila de auditoría (CREAR / ACTUALIZAR / ELIMINAR).
    pub async fn registrar_auditoria<'e, E>(
        &self,
        executor: E,
        producto_id: i32,
        accion: &str,
        detalle_cambio: &str,
        usuario_id: Option<i32>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO auditoria_productos (producto_id, accion, detalle_cambio, fecha_movimiento, usuario_id)
            VALUES ($1, $2, $3, NOW(), $4)
            "#,
        )
        .bind(producto_id)
        .bind(accion)
        .bind(detalle_cambio)
        .bind(usuario_id)
        .execute(executor)
        .await?;

        Ok(())
    }
}
