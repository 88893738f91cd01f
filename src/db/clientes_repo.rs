// src/db/clientes_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::clientes::{AuditoriaCliente, Cliente, NuevoCliente},
};

#[derive(Clone)]
pub struct ClientesRepository {
    pool: PgPool,
}

impl ClientesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pool subyacente, para que el servicio arme sus propias transacciones.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn obtener_clientes(
        &self,
        search: Option<&str>,
        obra_social_id: Option<i32>,
        ciudad_id: Option<i32>,
    ) -> Result<Vec<Cliente>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT
                cl.cliente_id,
                cl.nombre,
                cl.apellido,
                cl.dni,
                os.obra_social_id,
                os.obra_social,
                ci.ciudad_id,
                ci.nombre AS ciudad
            FROM clientes cl
            LEFT JOIN obras_sociales os ON os.obra_social_id = cl.obra_social_id
            LEFT JOIN ciudades ci ON ci.ciudad_id = cl.ciudad_id
            WHERE cl.deleted_at IS NULL
            "#,
        );

        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let patron = format!("%{}%", search.trim());
            builder.push(" AND (cl.nombre ILIKE ");
            builder.push_bind(patron.clone());
            builder.push(" OR cl.apellido ILIKE ");
            builder.push_bind(patron.clone());
            builder.push(" OR cl.dni ILIKE ");
            builder.push_bind(patron);
            builder.push(")");
        }

        if let Some(obra_social_id) = obra_social_id {
            builder.push(" AND cl.obra_social_id = ");
            builder.push_bind(obra_social_id);
        }

        if let Some(ciudad_id) = ciudad_id {
            builder.push(" AND cl.ciudad_id = ");
            builder.push_bind(ciudad_id);
        }

        builder.push(" ORDER BY cl.apellido, cl.nombre");

        let clientes = builder
            .build_query_as::<Cliente>()
            .fetch_all(&self.pool)
            .await?;

        Ok(clientes)
    }

    pub async fn obtener_por_id<'e, E>(
        &self,
        executor: E,
        cliente_id: i32,
    ) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            SELECT
                cl.cliente_id, cl.nombre, cl.apellido, cl.dni,
                os.obra_social_id, os.obra_social,
                ci.ciudad_id, ci.nombre AS ciudad
            FROM clientes cl
            LEFT JOIN obras_sociales os ON os.obra_social_id = cl.obra_social_id
            LEFT JOIN ciudades ci ON ci.ciudad_id = cl.ciudad_id
            WHERE cl.cliente_id = $1 AND cl.deleted_at IS NULL
            "#,
        )
        .bind(cliente_id)
        .fetch_optional(executor)
        .await?;

        Ok(cliente)
    }

    pub async fn agregar_cliente<'e, E>(
        &self,
        executor: E,
        nuevo: &NuevoCliente,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (cliente_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO clientes (nombre, apellido, dni, obra_social_id, ciudad_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING cliente_id
            "#,
        )
        .bind(&nuevo.nombre)
        .bind(&nuevo.apellido)
        .bind(&nuevo.dni)
        .bind(nuevo.obra_social_id)
        .bind(nuevo.ciudad_id)
        .fetch_one(executor)
        .await?;

        Ok(cliente_id)
    }

    pub async fn actualizar_cliente<'e, E>(
        &self,
        executor: E,
        cliente_id: i32,
        cliente: &NuevoCliente,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE clientes
            SET nombre = $1, apellido = $2, dni = $3, obra_social_id = $4, ciudad_id = $5
            WHERE cliente_id = $6 AND deleted_at IS NULL
            "#,
        )
        .bind(&cliente.nombre)
        .bind(&cliente.apellido)
        .bind(&cliente.dni)
        .bind(cliente.obra_social_id)
        .bind(cliente.ciudad_id)
        .bind(cliente_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Borrado lógico: el historial de ventas del cliente sigue
    /// consultable.
    pub async fn eliminar_cliente<'e, E>(
        &self,
        executor: E,
        cliente_id: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE clientes SET deleted_at = NOW() WHERE cliente_id = $1 AND deleted_at IS NULL",
        )
        .bind(cliente_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn obtener_auditoria(
        &self,
        cliente_id: i32,
    ) -> Result<Vec<AuditoriaCliente>, AppError> {
        let auditoria = sqlx::query_as::<_, AuditoriaCliente>(
            r#"
            SELECT auditoria_id, cliente_id, accion, detalle_cambio, fecha_movimiento, usuario_id
            FROM auditoria_clientes
            WHERE cliente_id = $1
            ORDER BY fecha_movimiento DESC
            "#,
        )
        .bind(cliente_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(auditoria)
    }

    /// Registra una fila de auditoría (CREAR / ACTUALIZAR / ELIMINAR).
    pub async fn registrar_auditoria<'e, E>(
        &self,
        executor: E,
        cliente_id: i32,
        accion: &str,
        detalle_cambio: &str,
        usuario_id: Option<i32>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO auditoria_clientes (cliente_id, accion, detalle_cambio, fecha_movimiento, usuario_id)
            VALUES ($1, $2, $3, NOW(), $4)
            "#,
        )
        .bind(cliente_id)
        .bind(accion)
        .bind(detalle_cambio)
        .bind(usuario_id)
        .execute(executor)
        .await?;

        Ok(())
    }
}
