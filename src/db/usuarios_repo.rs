// src/db/usuarios_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{ActualizarUsuario, NuevoUsuario, Rol, Sesion, Usuario, UsuarioListado},
};

#[derive(Clone)]
pub struct UsuariosRepository {
    pool: PgPool,
}

impl UsuariosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca el usuario con su rol y los permisos agregados en una sola
    /// cadena "permiso1, permiso2, ...". El llamador valida estado y hash.
    pub async fn obtener_por_correo(&self, correo: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT
                u.usuario_id,
                u.nombre,
                u.apellido,
                u.correo,
                u.contrasena,
                u.estado,
                r.rol_id,
                r.nombre AS rol,
                STRING_AGG(p.nombre, ', ' ORDER BY p.nombre) AS permisos
            FROM usuarios u
            LEFT JOIN roles r ON r.rol_id = u.rol_id
            LEFT JOIN roles_permisos rp ON rp.rol_id = r.rol_id
            LEFT JOIN permisos p ON p.permiso_id = rp.permiso_id
            WHERE u.correo = $1 AND u.deleted_at IS NULL
            GROUP BY u.usuario_id, u.nombre, u.apellido, u.correo, u.contrasena,
                     u.estado, r.rol_id, r.nombre
            "#,
        )
        .bind(correo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(usuario)
    }

    pub async fn obtener_usuarios(
        &self,
        page: i64,
        page_size: i64,
        search: &str,
        rol_id: Option<i32>,
    ) -> Result<Vec<UsuarioListado>, AppError> {
        let offset = (page - 1).max(0) * page_size;
        let patron = if search.trim().is_empty() {
            "%".to_string()
        } else {
            format!("%{}%", search.trim())
        };

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT
                u.usuario_id, u.nombre, u.apellido, u.correo, u.estado,
                r.rol_id, r.nombre AS rol
            FROM usuarios u
            LEFT JOIN roles r ON r.rol_id = u.rol_id
            WHERE u.deleted_at IS NULL
            "#,
        );

        builder.push(" AND (u.nombre ILIKE ");
        builder.push_bind(patron.clone());
        builder.push(" OR u.apellido ILIKE ");
        builder.push_bind(patron.clone());
        builder.push(" OR u.correo ILIKE ");
        builder.push_bind(patron);
        builder.push(")");

        if let Some(rol_id) = rol_id {
            builder.push(" AND r.rol_id = ");
            builder.push_bind(rol_id);
        }

        builder.push(" ORDER BY u.apellido, u.nombre LIMIT ");
        builder.push_bind(page_size);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let usuarios = builder
            .build_query_as::<UsuarioListado>()
            .fetch_all(&self.pool)
            .await?;

        Ok(usuarios)
    }

    pub async fn existe_correo(&self, correo: &str) -> Result<bool, AppError> {
        let (existe,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM usuarios WHERE correo = $1 AND deleted_at IS NULL)",
        )
        .bind(correo)
        .fetch_one(&self.pool)
        .await?;

        Ok(existe)
    }

    /// Inserta el usuario con la contraseña ya hasheada por el servicio.
    pub async fn insertar_usuario(
        &self,
        nuevo: &NuevoUsuario,
        contrasena_hash: &str,
    ) -> Result<i32, AppError> {
        let (usuario_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO usuarios (nombre, apellido, correo, rol_id, contrasena, estado)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING usuario_id
            "#,
        )
        .bind(&nuevo.nombre)
        .bind(&nuevo.apellido)
        .bind(&nuevo.correo)
        .bind(nuevo.rol_id)
        .bind(contrasena_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(usuario_id)
    }

    pub async fn actualizar_usuario(
        &self,
        usuario_id: i32,
        datos: &ActualizarUsuario,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE usuarios
            SET nombre = $1, apellido = $2, correo = $3, rol_id = $4
            WHERE usuario_id = $5 AND deleted_at IS NULL
            "#,
        )
        .bind(&datos.nombre)
        .bind(&datos.apellido)
        .bind(&datos.correo)
        .bind(datos.rol_id)
        .bind(usuario_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn actualizar_password(
        &self,
        correo: &str,
        contrasena_hash: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE usuarios SET contrasena = $1 WHERE correo = $2 AND deleted_at IS NULL",
        )
        .bind(contrasena_hash)
        .bind(correo)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Borrado lógico: las sesiones y ventas del usuario siguen
    /// consultables.
    pub async fn eliminar_usuario(&self, usuario_id: i32) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE usuarios SET deleted_at = NOW() WHERE usuario_id = $1 AND deleted_at IS NULL",
        )
        .bind(usuario_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn obtener_roles(&self) -> Result<Vec<Rol>, AppError> {
        let roles = sqlx::query_as::<_, Rol>(
            "SELECT rol_id, nombre AS rol FROM roles ORDER BY rol_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    /// Cierra cualquier sesión que el usuario haya dejado abierta.
    pub async fn cerrar_sesiones_abiertas(&self, correo: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE sesiones SET hora_logout = NOW() WHERE correo_usuario = $1 AND hora_logout IS NULL",
        )
        .bind(correo)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn insertar_sesion(
        &self,
        sesion_id: Uuid,
        correo: &str,
        navegador: Option<&str>,
        ip: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sesiones (sesion_id, correo_usuario, navegador, ip, hora_logueo, ultima_actividad)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            "#,
        )
        .bind(sesion_id)
        .bind(correo)
        .bind(navegador)
        .bind(ip)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Refresca ultima_actividad. Devuelve 0 si la sesión no existe
    /// o ya fue cerrada.
    pub async fn tocar_sesion(&self, sesion_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE sesiones SET ultima_actividad = NOW() WHERE sesion_id = $1 AND hora_logout IS NULL",
        )
        .bind(sesion_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn cerrar_sesion(&self, sesion_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE sesiones SET hora_logout = NOW() WHERE sesion_id = $1 AND hora_logout IS NULL",
        )
        .bind(sesion_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Historial de sesiones, las abiertas primero.
    pub async fn obtener_sesiones(&self) -> Result<Vec<Sesion>, AppError> {
        let sesiones = sqlx::query_as::<_, Sesion>(
            r#"
            SELECT
                s.sesion_id,
                s.correo_usuario,
                u.nombre || ' ' || u.apellido AS nombre_completo,
                s.navegador,
                s.ip,
                s.hora_logueo,
                s.ultima_actividad,
                s.hora_logout,
                CASE WHEN s.hora_logout IS NULL THEN 'ACTIVA' ELSE 'CERRADA' END AS estado,
                EXTRACT(EPOCH FROM (COALESCE(s.hora_logout, NOW()) - s.hora_logueo))::FLOAT8 / 60
                    AS duracion_minutos
            FROM sesiones s
            LEFT JOIN usuarios u ON u.correo = s.correo_usuario
            ORDER BY (s.hora_logout IS NULL) DESC, s.hora_logueo DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sesiones)
    }
}
