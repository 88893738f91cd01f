// src/services/usuarios_service.rs

use crate::{
    common::error::AppError,
    db::UsuariosRepository,
    models::auth::{ActualizarUsuario, NuevoUsuario},
};

#[derive(Clone)]
pub struct UsuariosService {
    repo: UsuariosRepository,
}

impl UsuariosService {
    pub fn new(repo: UsuariosRepository) -> Self {
        Self { repo }
    }

    /// Alta de usuario. El correo es único entre los usuarios vigentes;
    /// la contraseña se guarda hasheada, nunca en claro.
    pub async fn crear_usuario(&self, nuevo: NuevoUsuario) -> Result<i32, AppError> {
        if self.repo.existe_correo(&nuevo.correo).await? {
            return Err(AppError::CorreoRegistrado);
        }

        let hash = hashear_contrasena(nuevo.contrasena.clone()).await?;
        let usuario_id = self.repo.insertar_usuario(&nuevo, &hash).await?;

        tracing::info!(usuario_id, correo = %nuevo.correo, "Usuario creado");
        Ok(usuario_id)
    }

    pub async fn actualizar_usuario(
        &self,
        usuario_id: i32,
        datos: ActualizarUsuario,
    ) -> Result<(), AppError> {
        let filas = self.repo.actualizar_usuario(usuario_id, &datos).await?;
        if filas == 0 {
            return Err(AppError::NoEncontrado("Usuario"));
        }

        tracing::info!(usuario_id, "Usuario actualizado");
        Ok(())
    }

    pub async fn cambiar_password(&self, correo: &str, password: String) -> Result<(), AppError> {
        let hash = hashear_contrasena(password).await?;

        let filas = self.repo.actualizar_password(correo, &hash).await?;
        if filas == 0 {
            return Err(AppError::NoEncontrado("Usuario"));
        }

        tracing::info!(correo, "Contraseña actualizada");
        Ok(())
    }

    pub async fn eliminar_usuario(&self, usuario_id: i32) -> Result<(), AppError> {
        let filas = self.repo.eliminar_usuario(usuario_id).await?;
        if filas == 0 {
            return Err(AppError::NoEncontrado("Usuario"));
        }

        tracing::info!(usuario_id, "Usuario eliminado");
        Ok(())
    }
}

/// bcrypt es costoso, fuera del runtime async.
async fn hashear_contrasena(contrasena: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(&contrasena, bcrypt::DEFAULT_COST))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn el_hash_generado_verifica_contra_la_contrasena_original() {
        let hash = hashear_contrasena("secreta123".to_string()).await.unwrap();

        assert_ne!(hash, "secreta123");
        assert!(bcrypt::verify("secreta123", &hash).unwrap());
        assert!(!bcrypt::verify("otra-cosa", &hash).unwrap());
    }
}
