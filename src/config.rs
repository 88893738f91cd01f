// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        ClientesRepository, LotesRepository, ObrasSocialesRepository, PgVencimientosRepo,
        ProductosRepository, ProveedoresRepository, UsuariosRepository, VentasRepository,
    },
    services::{
        AuthService, ClientesService, EmailService, LiquidacionService, LotesService,
        ObrasSocialesService, ProductosService, UsuariosService, VencimientosService,
        VentasService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,

    pub clientes_repo: ClientesRepository,
    pub lotes_repo: LotesRepository,
    pub obras_sociales_repo: ObrasSocialesRepository,
    pub productos_repo: ProductosRepository,
    pub proveedores_repo: ProveedoresRepository,
    pub usuarios_repo: UsuariosRepository,
    pub ventas_repo: VentasRepository,

    pub auth_service: AuthService,
    pub clientes_service: ClientesService,
    pub email_service: EmailService,
    pub liquidacion_service: LiquidacionService,
    pub lotes_service: LotesService,
    pub obras_sociales_service: ObrasSocialesService,
    pub productos_service: ProductosService,
    pub usuarios_service: UsuariosService,
    pub vencimientos_service: VencimientosService,
    pub ventas_service: VentasService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL debe estar definida")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida");

        // --- Grafo de dependencias ---
        let clientes_repo = ClientesRepository::new(db_pool.clone());
        let lotes_repo = LotesRepository::new(db_pool.clone());
        let obras_sociales_repo = ObrasSocialesRepository::new(db_pool.clone());
        let productos_repo = ProductosRepository::new(db_pool.clone());
        let proveedores_repo = ProveedoresRepository::new(db_pool.clone());
        let usuarios_repo = UsuariosRepository::new(db_pool.clone());
        let ventas_repo = VentasRepository::new(db_pool.clone());

        let auth_service = AuthService::new(usuarios_repo.clone());
        let clientes_service = ClientesService::new(clientes_repo.clone());
        let email_service = EmailService::from_env()?;
        let liquidacion_service = LiquidacionService::new(obras_sociales_repo.clone());
        let lotes_service = LotesService::new(lotes_repo.clone());
        let obras_sociales_service = ObrasSocialesService::new(obras_sociales_repo.clone());
        let productos_service = ProductosService::new(productos_repo.clone());
        let usuarios_service = UsuariosService::new(usuarios_repo.clone());
        let vencimientos_service =
            VencimientosService::new(Arc::new(PgVencimientosRepo::new(db_pool.clone())));
        let ventas_service = VentasService::new(ventas_repo.clone());

        Ok(Self {
            db_pool,
            clientes_repo,
            lotes_repo,
            obras_sociales_repo,
            productos_repo,
            proveedores_repo,
            usuarios_repo,
            ventas_repo,
            auth_service,
            clientes_service,
            email_service,
            liquidacion_service,
            lotes_service,
            obras_sociales_service,
            productos_service,
            usuarios_service,
            vencimientos_service,
            ventas_service,
        })
    }
}
