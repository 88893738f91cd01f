// src/models/vencimientos.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

// --- 1. Lote próximo a vencer (fila tipificada del repositorio) ---
// Una sola forma de fila para todo el análisis: el servicio nunca
// vuelve a mirar la base, todo lo que necesita viene acá.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LoteProximo {
    pub lote_id: i32,
    pub numero_lote: String,
    pub producto_id: i32,
    pub producto_nombre: String,
    pub producto_codigo: String,
    pub marca: Option<String>,
    pub categoria_nombre: Option<String>,
    pub fecha_vencimiento: NaiveDate,
    pub dias_restantes: i32,
    pub cantidad_actual: i32,
    pub precio_compra: Option<Decimal>,
    pub precio_venta: Option<Decimal>,
    pub valor_inventario: Decimal,
    pub proveedor_nombre: Option<String>,
}

// --- 2. Ventas históricas de un producto (ventana de 90 días) ---
// Derivado por corrida de análisis, nunca se persiste.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct VentasHistoricas {
    pub total_vendido: i64,
    pub cantidad_ventas: i64,
}

// --- 3. Nivel de prioridad de un lote ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Prioridad {
    Critica,
    Alta,
    Media,
    Baja,
    Normal,
}

// --- 4. Riesgo cualitativo de vencer con stock ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiesgoVencimiento {
    Alto,
    Medio,
    Bajo,
}

// --- 5. Acciones recomendadas ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccionRecomendada {
    Promocion,
    RevisionCompras,
    RevisionProducto,
    Planificacion,
}

// --- 6. Recomendaciones ---
// Enum cerrado en lugar de objetos con claves sueltas: el compilador
// verifica exhaustividad y el JSON mantiene la forma
// { tipo, mensaje, accion, prioridad } que espera el frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "RecomendacionJson")]
pub enum Recomendacion {
    AccionInmediata,
    Promocion,
    GestionInventario,
    ProductoLento,
    Oportunidad,
}

impl Recomendacion {
    pub fn mensaje(self) -> &'static str {
        match self {
            Recomendacion::AccionInmediata => {
                "Aplicar descuento urgente del 20-30% para acelerar ventas"
            }
            Recomendacion::Promocion => {
                "Considerar descuento del 10-15% para estimular ventas"
            }
            Recomendacion::GestionInventario => {
                "Revisar estrategia de compra para evitar acumulación de stock"
            }
            Recomendacion::ProductoLento => {
                "Producto sin ventas recientes. Considerar promoción especial o evaluación de demanda"
            }
            Recomendacion::Oportunidad => {
                "Buena velocidad de venta. Considerar estrategia de reposición anticipada"
            }
        }
    }

    pub fn accion(self) -> AccionRecomendada {
        match self {
            Recomendacion::AccionInmediata | Recomendacion::Promocion => {
                AccionRecomendada::Promocion
            }
            Recomendacion::GestionInventario => AccionRecomendada::RevisionCompras,
            Recomendacion::ProductoLento => AccionRecomendada::RevisionProducto,
            Recomendacion::Oportunidad => AccionRecomendada::Planificacion,
        }
    }

    pub fn prioridad(self) -> Prioridad {
        match self {
            Recomendacion::AccionInmediata | Recomendacion::ProductoLento => Prioridad::Alta,
            Recomendacion::Promocion | Recomendacion::GestionInventario => Prioridad::Media,
            Recomendacion::Oportunidad => Prioridad::Baja,
        }
    }
}

// Forma serializada de una recomendación (la de la API histórica).
#[derive(Debug, Clone, Serialize)]
pub struct RecomendacionJson {
    pub tipo: &'static str,
    pub mensaje: &'static str,
    pub accion: AccionRecomendada,
    pub prioridad: Prioridad,
}

impl From<Recomendacion> for RecomendacionJson {
    fn from(rec: Recomendacion) -> Self {
        let tipo = match rec {
            Recomendacion::AccionInmediata => "ACCION_INMEDIATA",
            Recomendacion::Promocion => "PROMOCION",
            Recomendacion::GestionInventario => "GESTION_INVENTARIO",
            Recomendacion::ProductoLento => "PRODUCTO_LENTO",
            Recomendacion::Oportunidad => "OPORTUNIDAD",
        };
        Self {
            tipo,
            mensaje: rec.mensaje(),
            accion: rec.accion(),
            prioridad: rec.prioridad(),
        }
    }
}

// --- 7. Lote analizado ---
// Un LoteProximo enriquecido con el análisis. Vive sólo durante una
// llamada: sin persistencia, sin identidad entre llamadas.
#[derive(Debug, Clone, Serialize)]
pub struct LoteAnalizado {
    #[serde(flatten)]
    pub lote: LoteProximo,
    pub velocidad_venta: f64,
    pub dias_para_vender: i32,
    pub score_urgencia: i32,
    pub prioridad: Prioridad,
    pub recomendaciones: Vec<Recomendacion>,
    pub riesgo_vencimiento: RiesgoVencimiento,
}

// --- 8. Notificaciones categorizadas por prioridad ---
#[derive(Debug, Clone, Serialize, Default)]
pub struct NotificacionesCategorizadas {
    pub criticas: Vec<LoteAnalizado>,
    pub alta: Vec<LoteAnalizado>,
    pub media: Vec<LoteAnalizado>,
    pub baja: Vec<LoteAnalizado>,
    /// Todos los lotes, ordenados por score descendente.
    pub todas: Vec<LoteAnalizado>,
}

// --- 9. Resumen ejecutivo ---
#[derive(Debug, Clone, Serialize)]
pub struct ResumenEjecutivo {
    pub total_lotes_en_riesgo: usize,
    pub valor_total_inventario_riesgo: Decimal,
    pub valor_inventario_critico: Decimal,
    pub porcentaje_valor_critico: i32,
    pub lotes_vencidos: usize,
    pub lotes_alta_prioridad: usize,
    pub acciones_recomendadas: AccionesRecomendadas,
    pub tendencia: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AccionesRecomendadas {
    pub promocion: u32,
    pub revision_compras: u32,
    pub revision_producto: u32,
    pub planificacion: u32,
}

// --- 10. Resultado completo de una corrida de análisis ---
#[derive(Debug, Clone, Serialize)]
pub struct ResultadoNotificaciones {
    pub resumen: ResumenEjecutivo,
    pub notificaciones: NotificacionesCategorizadas,
    pub timestamp: DateTime<Utc>,
}

// --- 11. Predicción de vencimientos futuros ---

/// Producto con historial repetido de lotes vencidos con stock remanente.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductoProblematico {
    pub producto_id: i32,
    pub nombre: String,
    pub veces_vencido: i64,
    pub perdida_promedio: Option<Decimal>,
}

/// Producto con stock alto y baja rotación en los últimos 90 días.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductoAltoRiesgo {
    pub producto_id: i32,
    pub nombre: String,
    pub stock: i32,
    pub unidades_vendidas_90dias: i64,
    pub ratio_stock_venta: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultadoPrediccion {
    pub productos_problematicos: Vec<ProductoProblematico>,
    pub productos_alto_riesgo: Vec<ProductoAltoRiesgo>,
    pub recomendacion_general: String,
}
