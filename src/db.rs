// src/db.rs

pub mod clientes_repo;
pub mod lotes_repo;
pub mod obras_sociales_repo;
pub mod productos_repo;
pub mod proveedores_repo;
pub mod usuarios_repo;
pub mod vencimientos_repo;
pub mod ventas_repo;

pub use clientes_repo::ClientesRepository;
pub use lotes_repo::{FiltrosLotes, LotesRepository};
pub use obras_sociales_repo::ObrasSocialesRepository;
pub use productos_repo::ProductosRepository;
pub use proveedores_repo::ProveedoresRepository;
pub use usuarios_repo::UsuariosRepository;
pub use vencimientos_repo::{PgVencimientosRepo, VencimientosRepo};
pub use ventas_repo::VentasRepository;
