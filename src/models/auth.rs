// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// Un usuario tal como viene de la base.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Usuario {
    pub usuario_id: i32,
    pub nombre: String,
    pub apellido: String,
    pub correo: String,

    // IMPORTANTE: nunca serializar el hash
    #[serde(skip_serializing)]
    pub contrasena: String,

    pub estado: bool,
    pub rol_id: Option<i32>,
    pub rol: Option<String>,
    pub permisos: Option<String>,
}

// Fila del listado de usuarios. Sin la contraseña: el hash nunca
// sale del repo salvo para verificar el login.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UsuarioListado {
    pub usuario_id: i32,
    pub nombre: String,
    pub apellido: String,
    pub correo: String,
    pub estado: bool,
    pub rol_id: Option<i32>,
    pub rol: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NuevoUsuario {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,
    #[validate(length(min = 1, message = "El apellido es obligatorio."))]
    pub apellido: String,
    #[validate(email(message = "El correo proporcionado es inválido."))]
    pub correo: String,
    pub rol_id: Option<i32>,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub contrasena: String,
}

// Actualización de datos del usuario. La contraseña va por su
// propio endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct ActualizarUsuario {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,
    #[validate(length(min = 1, message = "El apellido es obligatorio."))]
    pub apellido: String,
    #[validate(email(message = "El correo proporcionado es inválido."))]
    pub correo: String,
    pub rol_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CambioPassword {
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Rol {
    pub rol_id: i32,
    pub rol: String,
}

// Datos para login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "El correo proporcionado es inválido."))]
    pub correo: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria."))]
    pub contrasena: String,
}

// Respuesta de login: datos del usuario + id de la sesión abierta.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub usuario_id: i32,
    pub nombre: String,
    pub apellido: String,
    pub correo: String,
    pub estado: bool,
    pub rol_id: Option<i32>,
    pub rol: Option<String>,
    pub permisos: Vec<String>,
    pub sesion_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LogoutPayload {
    pub sesion_id: Uuid,
}

// Una sesión abierta o cerrada, con estado y duración calculados.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Sesion {
    pub sesion_id: Uuid,
    pub correo_usuario: String,
    pub nombre_completo: Option<String>,
    pub navegador: Option<String>,
    pub ip: Option<String>,
    pub hora_logueo: DateTime<Utc>,
    pub ultima_actividad: DateTime<Utc>,
    pub hora_logout: Option<DateTime<Utc>>,
    pub estado: Option<String>,
    pub duracion_minutos: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alta_de_usuario_exige_correo_valido_y_contrasena_minima() {
        let nuevo = NuevoUsuario {
            nombre: "Ana".to_string(),
            apellido: "Pérez".to_string(),
            correo: "no-es-un-correo".to_string(),
            rol_id: Some(2),
            contrasena: "123".to_string(),
        };

        let errores = nuevo.validate().unwrap_err();
        let campos = errores.field_errors();
        assert!(campos.contains_key("correo"));
        assert!(campos.contains_key("contrasena"));
    }

    #[test]
    fn alta_de_usuario_valida_con_datos_completos() {
        let nuevo = NuevoUsuario {
            nombre: "Ana".to_string(),
            apellido: "Pérez".to_string(),
            correo: "ana.perez@farmagest.com".to_string(),
            rol_id: Some(2),
            contrasena: "secreta123".to_string(),
        };

        assert!(nuevo.validate().is_ok());
    }

    #[test]
    fn cambio_de_password_rechaza_contrasenas_cortas() {
        let cambio = CambioPassword {
            password: "abc".to_string(),
        };
        assert!(cambio.validate().is_err());

        let cambio = CambioPassword {
            password: "abc123".to_string(),
        };
        assert!(cambio.validate().is_ok());
    }
}
