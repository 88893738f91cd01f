// src/services/auth_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UsuariosRepository,
    models::auth::{LoginPayload, LoginResponse},
};

#[derive(Clone)]
pub struct AuthService {
    repo: UsuariosRepository,
}

impl AuthService {
    pub fn new(repo: UsuariosRepository) -> Self {
        Self { repo }
    }

    /// Verifica las credenciales y abre una sesión nueva. Si el usuario
    /// tenía sesiones abiertas se cierran primero: una sola sesión
    /// activa por usuario.
    pub async fn login(
        &self,
        payload: LoginPayload,
        navegador: Option<String>,
        ip: Option<String>,
    ) -> Result<LoginResponse, AppError> {
        let usuario = self
            .repo
            .obtener_por_correo(&payload.correo)
            .await?
            .ok_or(AppError::CredencialesInvalidas)?;

        if !usuario.estado {
            return Err(AppError::CredencialesInvalidas);
        }

        // bcrypt es costoso, fuera del runtime async
        let hash = usuario.contrasena.clone();
        let contrasena = payload.contrasena;
        let valida = tokio::task::spawn_blocking(move || bcrypt::verify(&contrasena, &hash))
            .await
            .map_err(anyhow::Error::from)??;

        if !valida {
            return Err(AppError::CredencialesInvalidas);
        }

        let cerradas = self.repo.cerrar_sesiones_abiertas(&usuario.correo).await?;
        if cerradas > 0 {
            tracing::info!(correo = %usuario.correo, cerradas, "Sesiones previas cerradas");
        }

        let sesion_id = Uuid::new_v4();
        self.repo
            .insertar_sesion(
                sesion_id,
                &usuario.correo,
                navegador.as_deref(),
                ip.as_deref(),
            )
            .await?;

        tracing::info!(correo = %usuario.correo, %sesion_id, "✅ Login exitoso");

        Ok(LoginResponse {
            usuario_id: usuario.usuario_id,
            nombre: usuario.nombre,
            apellido: usuario.apellido,
            correo: usuario.correo,
            estado: usuario.estado,
            rol_id: usuario.rol_id,
            rol: usuario.rol,
            permisos: parsear_permisos(usuario.permisos.as_deref()),
            sesion_id,
        })
    }

    /// Cierra la sesión indicada. Cerrar una sesión ya cerrada no es
    /// un error.
    pub async fn logout(&self, sesion_id: Uuid) -> Result<(), AppError> {
        let filas = self.repo.cerrar_sesion(sesion_id).await?;
        if filas == 0 {
            tracing::warn!(%sesion_id, "Logout sobre sesión inexistente o ya cerrada");
        } else {
            tracing::info!(%sesion_id, "Sesión cerrada");
        }
        Ok(())
    }
}

/// La base entrega los permisos como una cadena "a, b, c".
fn parsear_permisos(permisos: Option<&str>) -> Vec<String> {
    permisos
        .unwrap_or_default()
        .split(", ")
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permisos_vacios_dan_lista_vacia() {
        assert!(parsear_permisos(None).is_empty());
        assert!(parsear_permisos(Some("")).is_empty());
    }

    #[test]
    fn permisos_se_separan_por_coma_y_espacio() {
        assert_eq!(
            parsear_permisos(Some("ventas.crear, productos.ver, reportes.ver")),
            vec!["ventas.crear", "productos.ver", "reportes.ver"]
        );
    }

    #[test]
    fn un_solo_permiso() {
        assert_eq!(parsear_permisos(Some("ventas.crear")), vec!["ventas.crear"]);
    }
}
