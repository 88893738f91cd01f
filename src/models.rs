pub mod auth;
pub mod clientes;
pub mod lotes;
pub mod obras_sociales;
pub mod productos;
pub mod proveedores;
pub mod vencimientos;
pub mod ventas;
