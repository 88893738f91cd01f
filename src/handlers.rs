// src/handlers.rs

pub mod auth;
pub mod clientes;
pub mod lotes;
pub mod notificaciones;
pub mod obras_sociales;
pub mod productos;
pub mod proveedores;
pub mod usuarios;
pub mod ventas;
