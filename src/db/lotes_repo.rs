// src/db/lotes_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::lotes::{Lote, MovimientoLote, NuevoLote},
};

// Filtros opcionales del listado de lotes.
#[derive(Debug, Default)]
pub struct FiltrosLotes {
    pub search: Option<String>,
    pub producto_id: Option<i32>,
    pub estado: Option<String>,
    pub dias_vencimiento: Option<i32>,
}

#[derive(Clone)]
pub struct LotesRepository {
    pool: PgPool,
}

impl LotesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn obtener_lotes(
        &self,
        page: i64,
        page_size: i64,
        filtros: &FiltrosLotes,
    ) -> Result<Vec<Lote>, AppError> {
        let offset = (page - 1).max(0) * page_size;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT
                l.lote_id,
                l.numero_lote,
                l.fecha_vencimiento,
                l.fecha_fabricacion,
                l.cantidad_inicial,
                l.cantidad_actual,
                l.precio_compra,
                l.precio_venta,
                l.estado,
                l.fecha_entrada,
                l.ubicacion,
                l.producto_id,
                p.nombre AS producto_nombre,
                p.codigo AS producto_codigo,
                pr.proveedor_id,
                pr.razon_social AS proveedor_nombre,
                (l.fecha_vencimiento - CURRENT_DATE)::INT AS dias_hasta_vencimiento
            FROM lotes l
            JOIN productos p ON l.producto_id = p.producto_id
            LEFT JOIN proveedores pr ON l.proveedor_id = pr.proveedor_id
            WHERE l.deleted_at IS NULL
            "#,
        );

        if let Some(search) = filtros.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let patron = format!("%{}%", search.trim());
            qb.push(" AND (l.numero_lote ILIKE ")
                .push_bind(patron.clone())
                .push(" OR p.nombre ILIKE ")
                .push_bind(patron.clone())
                .push(" OR p.codigo ILIKE ")
                .push_bind(patron)
                .push(")");
        }

        if let Some(producto_id) = filtros.producto_id {
            qb.push(" AND l.producto_id = ").push_bind(producto_id);
        }

        if let Some(estado) = filtros.estado.as_deref() {
            qb.push(" AND l.estado = ").push_bind(estado.to_string());
        }

        if let Some(dias) = filtros.dias_vencimiento {
            qb.push(" AND l.fecha_vencimiento <= CURRENT_DATE + ")
                .push_bind(dias)
                .push(" * INTERVAL '1 day'");
        }

        qb.push(" ORDER BY l.fecha_vencimiento ASC LIMIT ")
            .push_bind(page_size)
            .push(" OFFSET ")
            .push_bind(offset);

        let lotes = qb.build_query_as::<Lote>().fetch_all(&self.pool).await?;
        Ok(lotes)
    }

    /// Inserta un lote y registra el movimiento de ENTRADA inicial,
    /// todo dentro de una transacción.
    pub async fn agregar_lote(&self, nuevo: &NuevoLote) -> Result<i32, AppError> {
        let mut tx = self.pool.begin().await?;

        let cantidad_actual = nuevo.cantidad_actual.unwrap_or(nuevo.cantidad_inicial);

        let (lote_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO lotes (
                producto_id, numero_lote, fecha_vencimiento, fecha_fabricacion,
                cantidad_inicial, cantidad_actual, precio_compra, precio_venta,
                proveedor_id, ubicacion, observaciones
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING lote_id
            "#,
        )
        .bind(nuevo.producto_id)
        .bind(&nuevo.numero_lote)
        .bind(nuevo.fecha_vencimiento)
        .bind(nuevo.fecha_fabricacion)
        .bind(nuevo.cantidad_inicial)
        .bind(cantidad_actual)
        .bind(nuevo.precio_compra)
        .bind(nuevo.precio_venta)
        .bind(nuevo.proveedor_id)
        .bind(&nuevo.ubicacion)
        .bind(&nuevo.observaciones)
        .fetch_one(&mut *tx)
        .await?;

        self.registrar_movimiento(
            &mut *tx,
            lote_id,
            "ENTRADA",
            nuevo.cantidad_inicial,
            0,
            cantidad_actual,
            Some("Creación de lote"),
            None,
            None,
            nuevo.usuario_id,
        )
        .await?;

        tx.commit().await?;
        Ok(lote_id)
    }

    pub async fn obtener_movimientos(&self, lote_id: i32) -> Result<Vec<MovimientoLote>, AppError> {
        let movimientos = sqlx::query_as::<_, MovimientoLote>(
            r#"
            SELECT
                ml.movimiento_id,
                ml.lote_id,
                ml.tipo_movimiento,
                ml.cantidad,
                ml.cantidad_anterior,
                ml.cantidad_nueva,
                ml.motivo,
                ml.referencia_tipo,
                ml.referencia_id,
                ml.usuario_id,
                u.nombre || ' ' || u.apellido AS usuario_nombre,
                ml.fecha_movimiento
            FROM movimientos_lotes ml
            LEFT JOIN usuarios u ON ml.usuario_id = u.usuario_id
            WHERE ml.lote_id = $1
            ORDER BY ml.fecha_movimiento DESC
            "#,
        )
        .bind(lote_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movimientos)
    }

    pub async fn cantidad_actual<'e, E>(
        &self,
        executor: E,
        lote_id: i32,
    ) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fila: Option<(i32,)> =
            sqlx::query_as("SELECT cantidad_actual FROM lotes WHERE lote_id = $1")
                .bind(lote_id)
                .fetch_optional(executor)
                .await?;

        Ok(fila.map(|(c,)| c))
    }

    pub async fn actualizar_cantidad<'e, E>(
        &self,
        executor: E,
        lote_id: i32,
        nueva_cantidad: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE lotes SET cantidad_actual = $1, updated_at = CURRENT_TIMESTAMP WHERE lote_id = $2",
        )
        .bind(nueva_cantidad)
        .bind(lote_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn registrar_movimiento<'e, E>(
        &self,
        executor: E,
        lote_id: i32,
        tipo_movimiento: &str,
        cantidad: i32,
        cantidad_anterior: i32,
        cantidad_nueva: i32,
        motivo: Option<&str>,
        referencia_tipo: Option<&str>,
        referencia_id: Option<i32>,
        usuario_id: Option<i32>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO movimientos_lotes (
                lote_id, tipo_movimiento, cantidad, cantidad_anterior, cantidad_nueva,
                motivo, referencia_tipo, referencia_id, usuario_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(lote_id)
        .bind(tipo_movimiento)
        .bind(cantidad)
        .bind(cantidad_anterior)
        .bind(cantidad_nueva)
        .bind(motivo)
        .bind(referencia_tipo)
        .bind(referencia_id)
        .bind(usuario_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Pool subyacente, para que el servicio arme sus propias transacciones.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
