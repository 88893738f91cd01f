// src/db/proveedores_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::proveedores::{NuevoProveedor, Proveedor},
};

#[derive(Clone)]
pub struct ProveedoresRepository {
    pool: PgPool,
}

impl ProveedoresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn obtener_proveedores(&self, search: Option<&str>) -> Result<Vec<Proveedor>, AppError> {
        let patron = match search.filter(|s| !s.trim().is_empty()) {
            Some(s) => format!("%{}%", s.trim()),
            None => "%".to_string(),
        };

        let proveedores = sqlx::query_as::<_, Proveedor>(
            r#"
            SELECT proveedor_id, razon_social, direccion, telefono, email
            FROM proveedores
            WHERE razon_social ILIKE $1
            ORDER BY razon_social
            "#,
        )
        .bind(patron)
        .fetch_all(&self.pool)
        .await?;

        Ok(proveedores)
    }

    pub async fn obtener_por_id(&self, proveedor_id: i32) -> Result<Option<Proveedor>, AppError> {
        let proveedor = sqlx::query_as::<_, Proveedor>(
            r#"
            SELECT proveedor_id, razon_social, direccion, telefono, email
            FROM proveedores
            WHERE proveedor_id = $1
            "#,
        )
        .bind(proveedor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proveedor)
    }

    pub async fn agregar_proveedor(&self, nuevo: &NuevoProveedor) -> Result<i32, AppError> {
        let (proveedor_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO proveedores (razon_social, direccion, telefono, email)
            VALUES ($1, $2, $3, $4)
            RETURNING proveedor_id
            "#,
        )
        .bind(&nuevo.razon_social)
        .bind(&nuevo.direccion)
        .bind(&nuevo.telefono)
        .bind(&nuevo.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(proveedor_id)
    }

    pub async fn actualizar_proveedor(
        &self,
        proveedor_id: i32,
        proveedor: &NuevoProveedor,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE proveedores
            SET razon_social = $1, direccion = $2, telefono = $3, email = $4
            WHERE proveedor_id = $5
            "#,
        )
        .bind(&proveedor.razon_social)
        .bind(&proveedor.direccion)
        .bind(&proveedor.telefono)
        .bind(&proveedor.email)
        .bind(proveedor_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn eliminar_proveedor(&self, proveedor_id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM proveedores WHERE proveedor_id = $1")
            .bind(proveedor_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
