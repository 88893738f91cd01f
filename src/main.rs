// src/main.rs

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use tokio::net::TcpListener;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::sesion::{actividad_sesion, sesion_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Fallo al inicializar el estado de la aplicación.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Fallo al correr las migraciones de la base de datos.");

    tracing::info!("✅ Migraciones de la base de datos ejecutadas");

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    let usuarios_routes = Router::new()
        .route(
            "/",
            get(handlers::usuarios::obtener_usuarios).post(handlers::usuarios::crear_usuario),
        )
        .route("/roles", get(handlers::usuarios::obtener_roles))
        .route("/password/{correo}", put(handlers::usuarios::cambiar_password))
        .route(
            "/{id}",
            put(handlers::usuarios::actualizar_usuario)
                .delete(handlers::usuarios::eliminar_usuario),
        );

    let productos_routes = Router::new()
        .route(
            "/",
            get(handlers::productos::obtener_productos).post(handlers::productos::crear_producto),
        )
        .route("/filtros", get(handlers::productos::obtener_filtros))
        .route("/{id}/auditoria", get(handlers::productos::obtener_auditoria))
        .route(
            "/{id}",
            get(handlers::productos::obtener_producto)
                .put(handlers::productos::actualizar_producto)
                .delete(handlers::productos::eliminar_producto),
        );

    let lotes_routes = Router::new()
        .route(
            "/",
            get(handlers::lotes::obtener_lotes).post(handlers::lotes::crear_lote),
        )
        .route("/{id}/movimientos", get(handlers::lotes::obtener_movimientos))
        .route("/{id}/cantidad", patch(handlers::lotes::ajustar_cantidad));

    let ventas_routes = Router::new()
        .route(
            "/",
            get(handlers::ventas::obtener_ventas).post(handlers::ventas::crear_venta),
        )
        .route("/{id}", get(handlers::ventas::obtener_venta));

    let clientes_routes = Router::new()
        .route(
            "/",
            get(handlers::clientes::obtener_clientes).post(handlers::clientes::crear_cliente),
        )
        .route(
            "/{id}",
            get(handlers::clientes::obtener_cliente)
                .put(handlers::clientes::actualizar_cliente)
                .delete(handlers::clientes::eliminar_cliente),
        )
        .route("/{id}/ventas", get(handlers::clientes::obtener_ventas_cliente))
        .route("/{id}/auditoria", get(handlers::clientes::obtener_auditoria));

    let proveedores_routes = Router::new()
        .route(
            "/",
            get(handlers::proveedores::obtener_proveedores)
                .post(handlers::proveedores::crear_proveedor),
        )
        .route(
            "/{id}",
            get(handlers::proveedores::obtener_proveedor)
                .put(handlers::proveedores::actualizar_proveedor)
                .delete(handlers::proveedores::eliminar_proveedor),
        );

    let obras_sociales_routes = Router::new()
        .route(
            "/",
            get(handlers::obras_sociales::obtener_obras_sociales)
                .post(handlers::obras_sociales::crear_obra_social),
        )
        .route(
            "/liquidacion",
            get(handlers::obras_sociales::obtener_liquidacion),
        )
        .route(
            "/{id}",
            put(handlers::obras_sociales::actualizar_obra_social)
                .delete(handlers::obras_sociales::eliminar_obra_social),
        )
        .route(
            "/{id}/auditoria",
            get(handlers::obras_sociales::obtener_auditoria),
        );

    let notificaciones_routes = Router::new()
        .route("/", get(handlers::notificaciones::obtener_notificaciones))
        .route(
            "/predicciones",
            get(handlers::notificaciones::obtener_predicciones),
        );

    // Las rutas de ventas y lotes exigen sesión abierta.
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/sesiones", get(handlers::auth::obtener_sesiones))
        .nest("/api/auth", auth_routes)
        .nest("/api/usuarios", usuarios_routes)
        .nest("/api/productos", productos_routes)
        .nest(
            "/api/lotes",
            lotes_routes.layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                sesion_guard,
            )),
        )
        .nest(
            "/api/ventas",
            ventas_routes.layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                sesion_guard,
            )),
        )
        .nest("/api/clientes", clientes_routes)
        .nest("/api/proveedores", proveedores_routes)
        .nest("/api/obras-sociales", obras_sociales_routes)
        .nest("/api/notificaciones-ia", notificaciones_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            actividad_sesion,
        ))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Fallo al iniciar el listener TCP");
    tracing::info!("🚀 Servidor escuchando en {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Error en el servidor Axum");
}
