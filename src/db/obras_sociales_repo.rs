// src/db/obras_sociales_repo.rs

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::obras_sociales::{
        AuditoriaObraSocial, NuevaObraSocial, ObraSocial, VentaLiquidacion,
    },
};

#[derive(Clone)]
pub struct ObrasSocialesRepository {
    pool: PgPool,
}

impl ObrasSocialesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pool subyacente, para que el servicio arme sus propias transacciones.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn obtener_obras_sociales(&self) -> Result<Vec<ObraSocial>, AppError> {
        let obras = sqlx::query_as::<_, ObraSocial>(
            r#"
            SELECT obra_social_id, obra_social, plan, descuento, codigo
            FROM obras_sociales
            WHERE deleted_at IS NULL
            ORDER BY obra_social, plan
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(obras)
    }

    pub async fn obtener_por_id<'e, E>(
        &self,
        executor: E,
        obra_social_id: i32,
    ) -> Result<Option<ObraSocial>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let obra = sqlx::query_as::<_, ObraSocial>(
            r#"
            SELECT obra_social_id, obra_social, plan, descuento, codigo
            FROM obras_sociales
            WHERE obra_social_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(obra_social_id)
        .fetch_optional(executor)
        .await?;

        Ok(obra)
    }

    pub async fn agregar_obra_social<'e, E>(
        &self,
        executor: E,
        nueva: &NuevaObraSocial,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let descuento = nueva.descuento.and_then(Decimal::from_f64);

        let (obra_social_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO obras_sociales (obra_social, plan, descuento, codigo)
            VALUES ($1, $2, $3, $4)
            RETURNING obra_social_id
            "#,
        )
        .bind(&nueva.obra_social)
        .bind(&nueva.plan)
        .bind(descuento)
        .bind(&nueva.codigo)
        .fetch_one(executor)
        .await?;

        Ok(obra_social_id)
    }

    pub async fn actualizar_obra_social<'e, E>(
        &self,
        executor: E,
        obra_social_id: i32,
        obra: &NuevaObraSocial,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let descuento = obra.descuento.and_then(Decimal::from_f64);

        let result = sqlx::query(
            r#"
            UPDATE obras_sociales
            SET obra_social = $1, plan = $2, descuento = $3, codigo = $4
            WHERE obra_social_id = $5 AND deleted_at IS NULL
            "#,
        )
        .bind(&obra.obra_social)
        .bind(&obra.plan)
        .bind(descuento)
        .bind(&obra.codigo)
        .bind(obra_social_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Borrado lógico: los clientes que la referencian y las ventas
    /// históricas no se tocan.
    pub async fn eliminar_obra_social<'e, E>(
        &self,
        executor: E,
        obra_social_id: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE obras_sociales SET deleted_at = NOW() WHERE obra_social_id = $1 AND deleted_at IS NULL",
        )
        .bind(obra_social_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn obtener_auditoria(
        &self,
        obra_social_id: i32,
    ) -> Result<Vec<AuditoriaObraSocial>, AppError> {
        let auditoria = sqlx::query_as::<_, AuditoriaObraSocial>(
            r#"
            SELECT auditoria_id, obra_social_id, accion, detalle_cambio, fecha_movimiento, usuario_id
            FROM auditoria_obras_sociales
            WHERE obra_social_id = $1
            ORDER BY fecha_movimiento DESC
            "#,
        )
        .bind(obra_social_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(auditoria)
    }

    /// Registra una fila de auditoría (CREAR / ACTUALIZAR / ELIMINAR).
    pub async fn registrar_auditoria<'e, E>(
        &self,
        executor: E,
        obra_social_id: i32,
        accion: &str,
        detalle_cambio: &str,
        usuario_id: Option<i32>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO auditoria_obras_sociales (obra_social_id, accion, detalle_cambio, fecha_movimiento, usuario_id)
            VALUES ($1, $2, $3, NOW(), $4)
            "#,
        )
        .bind(obra_social_id)
        .bind(accion)
        .bind(detalle_cambio)
        .bind(usuario_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Una misma obra social suele estar cargada varias veces, una por
    /// plan. Para liquidar se toman todos los ids que comparten nombre.
    pub async fn ids_con_mismo_nombre(
        &self,
        obra_social_id: i32,
    ) -> Result<Vec<i32>, AppError> {
        let ids: Vec<(i32,)> = sqlx::query_as(
            r#"
            SELECT obra_social_id
            FROM obras_sociales
            WHERE deleted_at IS NULL
              AND obra_social = (
                  SELECT obra_social FROM obras_sociales
                  WHERE obra_social_id = $1 AND deleted_at IS NULL
              )
            "#,
        )
        .bind(obra_social_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Ventas del período con su cliente y obra social resueltos,
    /// ordenadas por obra social y fecha descendente.
    pub async fn ventas_para_liquidacion(
        &self,
        fecha_desde: Option<&str>,
        fecha_hasta: Option<&str>,
        ids_obra_social: Option<&[i32]>,
        incluir_sin_obra_social: bool,
    ) -> Result<Vec<VentaLiquidacion>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT
                v.venta_id,
                v.fecha_hora,
                v.numero_factura,
                v.total_sin_descuento AS subtotal,
                v.descuento,
                v.total,
                c.nombre AS cliente_nombre,
                c.apellido AS cliente_apellido,
                c.dni AS cliente_dni,
                os.obra_social_id,
                COALESCE(os.obra_social, 'Sin obra social') AS obra_social,
                os.plan,
                COALESCE(os.descuento, 0) AS descuento_obra_social
            FROM ventas v
            JOIN clientes c ON v.cliente_id = c.cliente_id
            LEFT JOIN obras_sociales os ON c.obra_social_id = os.obra_social_id
            WHERE 1=1
            "#,
        );

        if let Some(desde) = fecha_desde.filter(|f| !f.trim().is_empty()) {
            builder.push(" AND v.fecha_hora::date >= ");
            builder.push_bind(desde.trim().to_string());
            builder.push("::date");
        }

        if let Some(hasta) = fecha_hasta.filter(|f| !f.trim().is_empty()) {
            builder.push(" AND v.fecha_hora::date <= ");
            builder.push_bind(hasta.trim().to_string());
            builder.push("::date");
        }

        match ids_obra_social {
            Some(ids) if !ids.is_empty() => {
                builder.push(" AND c.obra_social_id = ANY(");
                builder.push_bind(ids.to_vec());
                builder.push(")");
            }
            _ if !incluir_sin_obra_social => {
                builder.push(" AND c.obra_social_id IS NOT NULL");
            }
            _ => {}
        }

        builder.push(" ORDER BY os.obra_social, v.fecha_hora DESC");

        let ventas = builder
            .build_query_as::<VentaLiquidacion>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ventas)
    }
}
