// src/services.rs

pub mod auth_service;
pub mod clientes_service;
pub mod email_service;
pub mod liquidacion_service;
pub mod lotes_service;
pub mod obras_sociales_service;
pub mod productos_service;
pub mod usuarios_service;
pub mod vencimientos_service;
pub mod ventas_service;

pub use auth_service::AuthService;
pub use clientes_service::ClientesService;
pub use email_service::EmailService;
pub use liquidacion_service::LiquidacionService;
pub use lotes_service::LotesService;
pub use obras_sociales_service::ObrasSocialesService;
pub use productos_service::ProductosService;
pub use usuarios_service::UsuariosService;
pub use vencimientos_service::VencimientosService;
pub use ventas_service::VentasService;
