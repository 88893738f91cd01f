// src/services/vencimientos_service.rs
//
// Analizador de vencimientos: toma los lotes próximos a vencer, cruza
// cada uno con su historial de ventas y produce un score de urgencia,
// una prioridad, recomendaciones y un resumen ejecutivo.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{
    common::error::AppError,
    db::VencimientosRepo,
    models::vencimientos::{
        AccionRecomendada, AccionesRecomendadas, LoteAnalizado, LoteProximo,
        NotificacionesCategorizadas, Prioridad, Recomendacion, ResultadoNotificaciones,
        ResultadoPrediccion, ResumenEjecutivo, RiesgoVencimiento, VentasHistoricas,
    },
};

/// Parámetros del análisis. Los valores por defecto reproducen el
/// comportamiento histórico del sistema.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    /// Ventana móvil para estimar velocidad de venta, en días.
    pub ventana_ventas_dias: i64,
    /// Días de anticipación cuando el llamador no especifica.
    pub dias_anticipacion_default: i64,
    /// Sentinela para productos sin ventas en la ventana.
    pub dias_sin_ventas: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ventana_ventas_dias: 90,
            dias_anticipacion_default: 30,
            dias_sin_ventas: 999,
        }
    }
}

#[derive(Clone)]
pub struct VencimientosService {
    repo: Arc<dyn VencimientosRepo>,
    config: ScoringConfig,
}

impl VencimientosService {
    pub fn new(repo: Arc<dyn VencimientosRepo>) -> Self {
        Self {
            repo,
            config: ScoringConfig::default(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Corrida completa del análisis para los lotes que vencen dentro
    /// de `dias_anticipacion` días. Sin efectos sobre la base: dos
    /// corridas sobre los mismos datos dan el mismo resultado.
    pub async fn generar_notificaciones(
        &self,
        dias_anticipacion: i64,
    ) -> Result<ResultadoNotificaciones, AppError> {
        // La ventana se resuelve en la consulta, contra la misma fecha
        // de referencia con la que se calculan los dias_restantes.
        let lotes = self.repo.lotes_proximos_a_vencer(dias_anticipacion).await?;

        // Varios lotes pueden compartir producto: una sola consulta de
        // ventas por producto alcanza.
        let mut ventas_por_producto: HashMap<i32, VentasHistoricas> = HashMap::new();
        let mut analizados = Vec::with_capacity(lotes.len());

        for lote in lotes {
            let ventas = match ventas_por_producto.get(&lote.producto_id) {
                Some(ventas) => *ventas,
                None => {
                    let ventas = self
                        .repo
                        .ventas_historicas(lote.producto_id, self.config.ventana_ventas_dias)
                        .await?;
                    ventas_por_producto.insert(lote.producto_id, ventas);
                    ventas
                }
            };

            analizados.push(self.analizar_lote(lote, ventas));
        }

        let notificaciones = categorizar_notificaciones(analizados);
        let resumen = generar_resumen_ejecutivo(&notificaciones);

        Ok(ResultadoNotificaciones {
            resumen,
            notificaciones,
            timestamp: Utc::now(),
        })
    }

    /// Predicción basada en patrones históricos: productos que ya
    /// vencieron repetidas veces y productos con stock alto sin rotación.
    pub async fn predecir_vencimientos_futuros(&self) -> Result<ResultadoPrediccion, AppError> {
        let productos_problematicos = self.repo.productos_problematicos().await?;
        let productos_alto_riesgo = self.repo.productos_alto_riesgo().await?;

        Ok(ResultadoPrediccion {
            productos_problematicos,
            productos_alto_riesgo,
            recomendacion_general:
                "Revisar estrategia de compras para productos con historial de vencimientos"
                    .to_string(),
        })
    }

    fn analizar_lote(&self, lote: LoteProximo, ventas: VentasHistoricas) -> LoteAnalizado {
        let velocidad_venta = ventas.total_vendido as f64 / self.config.ventana_ventas_dias as f64;

        let dias_para_vender = if velocidad_venta > 0.0 {
            (lote.cantidad_actual as f64 / velocidad_venta).ceil() as i32
        } else {
            self.config.dias_sin_ventas
        };

        let valor = lote.valor_inventario.to_f64().unwrap_or(0.0);
        let score_urgencia = calcular_score_urgencia(lote.dias_restantes, dias_para_vender, valor);
        let prioridad = determinar_prioridad(score_urgencia, lote.dias_restantes);
        let recomendaciones =
            generar_recomendaciones(lote.dias_restantes, dias_para_vender, valor, velocidad_venta);
        let riesgo_vencimiento = clasificar_riesgo(dias_para_vender, lote.dias_restantes);

        LoteAnalizado {
            lote,
            velocidad_venta,
            dias_para_vender,
            score_urgencia,
            prioridad,
            recomendaciones,
            riesgo_vencimiento,
        }
    }
}

// Cortes heurísticos del score. Son valores históricos del sistema,
// sin justificación de negocio documentada: tratarlos como constantes
// ajustables, no como reglas.
const PUNTOS_VENCIDO: f64 = 40.0;
const PUNTOS_HASTA_7_DIAS: f64 = 35.0;
const PUNTOS_HASTA_15_DIAS: f64 = 25.0;
const PUNTOS_HASTA_30_DIAS: f64 = 15.0;
const PUNTOS_BASE: f64 = 5.0;
const TOPE_RIESGO_VENTA: f64 = 30.0;
const CORTES_VALOR: [(f64, f64); 5] = [
    (100_000.0, 30.0),
    (50_000.0, 20.0),
    (20_000.0, 15.0),
    (10_000.0, 10.0),
    (5_000.0, 5.0),
];
const VALOR_ALTO: f64 = 50_000.0;

/// Score de urgencia 0-100 a partir de tres factores: proximidad al
/// vencimiento (0-40), riesgo de no vender a tiempo (0-30) y valor
/// económico en juego (0-30).
fn calcular_score_urgencia(dias_restantes: i32, dias_para_vender: i32, valor_inventario: f64) -> i32 {
    let mut score = 0.0;

    score += if dias_restantes < 0 {
        PUNTOS_VENCIDO
    } else if dias_restantes <= 7 {
        PUNTOS_HASTA_7_DIAS
    } else if dias_restantes <= 15 {
        PUNTOS_HASTA_15_DIAS
    } else if dias_restantes <= 30 {
        PUNTOS_HASTA_30_DIAS
    } else {
        PUNTOS_BASE
    };

    if dias_para_vender > dias_restantes {
        let ratio = dias_para_vender as f64 / dias_restantes.max(1) as f64;
        score += (ratio * 10.0).min(TOPE_RIESGO_VENTA);
    }

    score += CORTES_VALOR
        .iter()
        .find(|(corte, _)| valor_inventario >= *corte)
        .map(|(_, puntos)| *puntos)
        .unwrap_or(0.0);

    score.round().clamp(0.0, 100.0) as i32
}

fn determinar_prioridad(score_urgencia: i32, dias_restantes: i32) -> Prioridad {
    if dias_restantes < 0 {
        Prioridad::Critica
    } else if score_urgencia >= 70 || dias_restantes <= 7 {
        Prioridad::Alta
    } else if score_urgencia >= 50 || dias_restantes <= 15 {
        Prioridad::Media
    } else if score_urgencia >= 30 || dias_restantes <= 30 {
        Prioridad::Baja
    } else {
        Prioridad::Normal
    }
}

fn generar_recomendaciones(
    dias_restantes: i32,
    dias_para_vender: i32,
    valor_inventario: f64,
    velocidad_venta: f64,
) -> Vec<Recomendacion> {
    let mut recomendaciones = Vec::new();

    if dias_restantes <= 7 && dias_para_vender > dias_restantes {
        recomendaciones.push(Recomendacion::AccionInmediata);
    } else if dias_restantes <= 15 && dias_para_vender as f64 > dias_restantes as f64 * 0.8 {
        recomendaciones.push(Recomendacion::Promocion);
    }

    if valor_inventario >= VALOR_ALTO && dias_restantes <= 30 {
        recomendaciones.push(Recomendacion::GestionInventario);
    }

    if velocidad_venta == 0.0 && dias_restantes <= 30 {
        recomendaciones.push(Recomendacion::ProductoLento);
    }

    if dias_para_vender as f64 <= dias_restantes as f64 * 0.5 && dias_restantes <= 30 {
        recomendaciones.push(Recomendacion::Oportunidad);
    }

    recomendaciones
}

fn clasificar_riesgo(dias_para_vender: i32, dias_restantes: i32) -> RiesgoVencimiento {
    if dias_para_vender > dias_restantes {
        RiesgoVencimiento::Alto
    } else if dias_para_vender as f64 > dias_restantes as f64 * 0.7 {
        RiesgoVencimiento::Medio
    } else {
        RiesgoVencimiento::Bajo
    }
}

fn categorizar_notificaciones(lotes: Vec<LoteAnalizado>) -> NotificacionesCategorizadas {
    let mut notificaciones = NotificacionesCategorizadas::default();

    for lote in &lotes {
        let bucket = match lote.prioridad {
            Prioridad::Critica => &mut notificaciones.criticas,
            Prioridad::Alta => &mut notificaciones.alta,
            Prioridad::Media => &mut notificaciones.media,
            Prioridad::Baja => &mut notificaciones.baja,
            Prioridad::Normal => continue,
        };
        bucket.push(lote.clone());
    }

    let mut todas = lotes;
    todas.sort_by(|a, b| b.score_urgencia.cmp(&a.score_urgencia));
    notificaciones.todas = todas;

    notificaciones
}

fn generar_resumen_ejecutivo(notificaciones: &NotificacionesCategorizadas) -> ResumenEjecutivo {
    let todas = &notificaciones.todas;

    let valor_total: Decimal = todas.iter().map(|l| l.lote.valor_inventario).sum();
    let valor_critico: Decimal = notificaciones
        .criticas
        .iter()
        .chain(notificaciones.alta.iter())
        .map(|l| l.lote.valor_inventario)
        .sum();

    let porcentaje_valor_critico = if valor_total > Decimal::ZERO {
        ((valor_critico / valor_total) * Decimal::from(100))
            .round()
            .to_i32()
            .unwrap_or(0)
    } else {
        0
    };

    ResumenEjecutivo {
        total_lotes_en_riesgo: todas.len(),
        valor_total_inventario_riesgo: valor_total,
        valor_inventario_critico: valor_critico,
        porcentaje_valor_critico,
        lotes_vencidos: notificaciones.criticas.len(),
        lotes_alta_prioridad: notificaciones.alta.len(),
        acciones_recomendadas: contar_acciones(todas),
        tendencia: calcular_tendencia(todas),
    }
}

fn contar_acciones(lotes: &[LoteAnalizado]) -> AccionesRecomendadas {
    let mut acciones = AccionesRecomendadas::default();

    for lote in lotes {
        for rec in &lote.recomendaciones {
            match rec.accion() {
                AccionRecomendada::Promocion => acciones.promocion += 1,
                AccionRecomendada::RevisionCompras => acciones.revision_compras += 1,
                AccionRecomendada::RevisionProducto => acciones.revision_producto += 1,
                AccionRecomendada::Planificacion => acciones.planificacion += 1,
            }
        }
    }

    acciones
}

fn calcular_tendencia(lotes: &[LoteAnalizado]) -> String {
    let vencidos = lotes.iter().filter(|l| l.lote.dias_restantes < 0).count();
    let criticos = lotes
        .iter()
        .filter(|l| (0..=7).contains(&l.lote.dias_restantes))
        .count();

    if vencidos > 0 {
        "CRITICA - Productos ya vencidos detectados".to_string()
    } else if criticos as f64 > lotes.len() as f64 * 0.3 {
        "ALTA - Más del 30% de lotes en situación crítica".to_string()
    } else if criticos > 0 {
        "ATENCION - Algunos lotes requieren acción inmediata".to_string()
    } else {
        "ESTABLE - Situación bajo control".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicI64, Ordering};

    use crate::models::vencimientos::{ProductoAltoRiesgo, ProductoProblematico};

    struct FakeRepo {
        lotes: Vec<LoteProximo>,
        ventas: HashMap<i32, VentasHistoricas>,
        problematicos: Vec<ProductoProblematico>,
        alto_riesgo: Vec<ProductoAltoRiesgo>,
        dias_consultados: AtomicI64,
    }

    impl FakeRepo {
        fn nuevo(lotes: Vec<LoteProximo>, ventas: HashMap<i32, VentasHistoricas>) -> Self {
            Self {
                lotes,
                ventas,
                problematicos: Vec::new(),
                alto_riesgo: Vec::new(),
                dias_consultados: AtomicI64::new(0),
            }
        }
    }

    #[async_trait]
    impl VencimientosRepo for FakeRepo {
        async fn lotes_proximos_a_vencer(
            &self,
            dias_anticipacion: i64,
        ) -> Result<Vec<LoteProximo>, AppError> {
            self.dias_consultados.store(dias_anticipacion, Ordering::SeqCst);
            Ok(self.lotes.clone())
        }

        async fn ventas_historicas(
            &self,
            producto_id: i32,
            _ventana_dias: i64,
        ) -> Result<VentasHistoricas, AppError> {
            Ok(self.ventas.get(&producto_id).copied().unwrap_or_default())
        }

        async fn productos_problematicos(&self) -> Result<Vec<ProductoProblematico>, AppError> {
            Ok(self.problematicos.clone())
        }

        async fn productos_alto_riesgo(&self) -> Result<Vec<ProductoAltoRiesgo>, AppError> {
            Ok(self.alto_riesgo.clone())
        }
    }

    fn lote(producto_id: i32, dias_restantes: i32, cantidad: i32, valor: i64) -> LoteProximo {
        let hoy = Utc::now().date_naive();
        LoteProximo {
            lote_id: producto_id * 10,
            numero_lote: format!("L-{producto_id:04}"),
            producto_id,
            producto_nombre: format!("Producto {producto_id}"),
            producto_codigo: format!("P{producto_id:04}"),
            marca: None,
            categoria_nombre: None,
            fecha_vencimiento: hoy + Duration::days(dias_restantes as i64),
            dias_restantes,
            cantidad_actual: cantidad,
            precio_compra: None,
            precio_venta: None,
            valor_inventario: Decimal::from(valor),
            proveedor_nombre: None,
        }
    }

    fn servicio(repo: FakeRepo) -> VencimientosService {
        VencimientosService::new(Arc::new(repo))
    }

    #[test]
    fn score_lote_vencido_suma_maximo_por_proximidad() {
        // Vencido, sin ventas (999 días para vender), valor alto.
        let score = calcular_score_urgencia(-3, 999, 150_000.0);
        // 40 + min(30, 999/1*10) + 30 = 100
        assert_eq!(score, 100);
    }

    #[test]
    fn score_queda_dentro_de_rango() {
        for dr in [-10, 0, 5, 12, 25, 60] {
            for dpv in [1, 30, 999] {
                for valor in [0.0, 7_500.0, 25_000.0, 120_000.0] {
                    let score = calcular_score_urgencia(dr, dpv, valor);
                    assert!((0..=100).contains(&score), "score {score} fuera de rango");
                }
            }
        }
    }

    #[test]
    fn score_escenario_tipico() {
        // 5 días restantes, 20 para vender, $60.000 en juego:
        // 35 + min(30, 20/5*10) + 20 = 85
        assert_eq!(calcular_score_urgencia(5, 20, 60_000.0), 85);
    }

    #[test]
    fn score_dia_cero_cuenta_como_critico_no_vencido() {
        // dias_restantes = 0 cae en el tramo <= 7, no en el de vencidos.
        let score = calcular_score_urgencia(0, 1, 0.0);
        // 35 + min(30, 1/1*10) + 0 = 45
        assert_eq!(score, 45);
        assert_eq!(determinar_prioridad(score, 0), Prioridad::Alta);
    }

    #[test]
    fn prioridad_vencido_siempre_critica() {
        // Aunque el score sea bajo, vencido manda.
        assert_eq!(determinar_prioridad(0, -1), Prioridad::Critica);
        assert_eq!(determinar_prioridad(100, -30), Prioridad::Critica);
    }

    #[test]
    fn prioridad_por_score_o_por_dias() {
        assert_eq!(determinar_prioridad(70, 29), Prioridad::Alta);
        assert_eq!(determinar_prioridad(10, 7), Prioridad::Alta);
        assert_eq!(determinar_prioridad(50, 29), Prioridad::Media);
        assert_eq!(determinar_prioridad(10, 15), Prioridad::Media);
        assert_eq!(determinar_prioridad(30, 31), Prioridad::Baja);
        assert_eq!(determinar_prioridad(10, 30), Prioridad::Baja);
        assert_eq!(determinar_prioridad(29, 31), Prioridad::Normal);
    }

    #[test]
    fn recomendaciones_urgente_excluye_promocion() {
        // La recomendación urgente y la de promoción son excluyentes.
        let recs = generar_recomendaciones(5, 20, 60_000.0, 1.5);
        assert_eq!(
            recs,
            vec![Recomendacion::AccionInmediata, Recomendacion::GestionInventario]
        );

        let recs = generar_recomendaciones(12, 11, 1_000.0, 1.5);
        assert_eq!(recs, vec![Recomendacion::Promocion]);
    }

    #[test]
    fn recomendaciones_producto_sin_ventas() {
        let recs = generar_recomendaciones(20, 999, 1_000.0, 0.0);
        assert!(recs.contains(&Recomendacion::ProductoLento));
        assert!(!recs.contains(&Recomendacion::Oportunidad));
    }

    #[test]
    fn recomendaciones_buena_rotacion() {
        // Se vende en menos de la mitad del plazo: oportunidad de reponer.
        let recs = generar_recomendaciones(20, 8, 1_000.0, 3.0);
        assert_eq!(recs, vec![Recomendacion::Oportunidad]);
    }

    #[test]
    fn recomendaciones_fuera_de_ventana_no_generan_nada() {
        let recs = generar_recomendaciones(45, 10, 60_000.0, 3.0);
        assert!(recs.is_empty());
    }

    #[test]
    fn riesgo_por_relacion_venta_vencimiento() {
        assert_eq!(clasificar_riesgo(31, 30), RiesgoVencimiento::Alto);
        assert_eq!(clasificar_riesgo(25, 30), RiesgoVencimiento::Medio);
        assert_eq!(clasificar_riesgo(10, 30), RiesgoVencimiento::Bajo);
    }

    #[tokio::test]
    async fn la_ventana_de_anticipacion_llega_a_la_consulta() {
        // La ventana se corta en la base, no en memoria: el servicio
        // pasa los días pedidos tal cual.
        let repo = Arc::new(FakeRepo::nuevo(vec![lote(1, 10, 5, 1_000)], HashMap::new()));
        let servicio = VencimientosService::new(repo.clone());

        servicio.generar_notificaciones(45).await.unwrap();
        assert_eq!(repo.dias_consultados.load(Ordering::SeqCst), 45);

        servicio.generar_notificaciones(7).await.unwrap();
        assert_eq!(repo.dias_consultados.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn sin_ventas_usa_sentinela_y_riesgo_alto() {
        let repo = FakeRepo::nuevo(vec![lote(1, 10, 40, 2_000)], HashMap::new());
        let servicio = servicio(repo);

        let resultado = servicio.generar_notificaciones(30).await.unwrap();
        let analizado = &resultado.notificaciones.todas[0];

        assert_eq!(analizado.velocidad_venta, 0.0);
        assert_eq!(analizado.dias_para_vender, 999);
        assert_eq!(analizado.riesgo_vencimiento, RiesgoVencimiento::Alto);
    }

    #[tokio::test]
    async fn velocidad_positiva_calcula_dias_para_vender() {
        let mut ventas = HashMap::new();
        // 180 unidades en 90 días = 2 por día; 40 en stock = 20 días.
        ventas.insert(
            1,
            VentasHistoricas {
                total_vendido: 180,
                cantidad_ventas: 60,
            },
        );
        let repo = FakeRepo::nuevo(vec![lote(1, 25, 40, 2_000)], ventas);
        let servicio = servicio(repo);

        let resultado = servicio.generar_notificaciones(30).await.unwrap();
        let analizado = &resultado.notificaciones.todas[0];

        assert_eq!(analizado.velocidad_venta, 2.0);
        assert_eq!(analizado.dias_para_vender, 20);
        assert_ne!(analizado.dias_para_vender, 999);
    }

    #[tokio::test]
    async fn categorizacion_y_resumen() {
        let lotes = vec![
            lote(1, -2, 10, 30_000),  // vencido -> CRITICA
            lote(2, 5, 50, 60_000),   // ALTA
            lote(3, 28, 5, 1_000),    // BAJA
        ];
        let mut ventas = HashMap::new();
        ventas.insert(
            3,
            VentasHistoricas {
                total_vendido: 90,
                cantidad_ventas: 30,
            },
        );
        let servicio = servicio(FakeRepo::nuevo(lotes, ventas));

        let resultado = servicio.generar_notificaciones(30).await.unwrap();
        let n = &resultado.notificaciones;

        assert_eq!(n.criticas.len(), 1);
        assert_eq!(n.alta.len(), 1);
        assert_eq!(n.baja.len(), 1);
        assert_eq!(n.todas.len(), 3);

        // todas ordenado por score descendente
        let scores: Vec<i32> = n.todas.iter().map(|l| l.score_urgencia).collect();
        let mut ordenado = scores.clone();
        ordenado.sort_by(|a, b| b.cmp(a));
        assert_eq!(scores, ordenado);

        let r = &resultado.resumen;
        assert_eq!(r.total_lotes_en_riesgo, 3);
        assert_eq!(r.lotes_vencidos, 1);
        assert_eq!(r.lotes_alta_prioridad, 1);
        assert_eq!(r.valor_total_inventario_riesgo, Decimal::from(91_000));
        assert_eq!(r.valor_inventario_critico, Decimal::from(90_000));
        // 90000 / 91000 = 98.9% -> 99
        assert_eq!(r.porcentaje_valor_critico, 99);
        assert_eq!(r.tendencia, "CRITICA - Productos ya vencidos detectados");
    }

    #[tokio::test]
    async fn resumen_sin_lotes_no_divide_por_cero() {
        let servicio = servicio(FakeRepo::nuevo(Vec::new(), HashMap::new()));

        let resultado = servicio.generar_notificaciones(30).await.unwrap();
        let r = &resultado.resumen;

        assert_eq!(r.total_lotes_en_riesgo, 0);
        assert_eq!(r.porcentaje_valor_critico, 0);
        assert_eq!(r.tendencia, "ESTABLE - Situación bajo control");
    }

    #[tokio::test]
    async fn tendencia_alta_cuando_mas_del_30_por_ciento_es_critico() {
        // 2 de 4 lotes con <= 7 días (50% > 30%), ninguno vencido.
        let lotes = vec![
            lote(1, 3, 10, 1_000),
            lote(2, 6, 10, 1_000),
            lote(3, 20, 10, 1_000),
            lote(4, 25, 10, 1_000),
        ];
        let servicio = servicio(FakeRepo::nuevo(lotes, HashMap::new()));

        let resultado = servicio.generar_notificaciones(30).await.unwrap();
        assert_eq!(
            resultado.resumen.tendencia,
            "ALTA - Más del 30% de lotes en situación crítica"
        );
    }

    #[tokio::test]
    async fn corridas_repetidas_dan_el_mismo_analisis() {
        let lotes = vec![lote(1, 5, 50, 60_000), lote(2, 20, 5, 1_000)];
        let servicio = servicio(FakeRepo::nuevo(lotes, HashMap::new()));

        let a = servicio.generar_notificaciones(30).await.unwrap();
        let b = servicio.generar_notificaciones(30).await.unwrap();

        let scores_a: Vec<i32> = a.notificaciones.todas.iter().map(|l| l.score_urgencia).collect();
        let scores_b: Vec<i32> = b.notificaciones.todas.iter().map(|l| l.score_urgencia).collect();
        assert_eq!(scores_a, scores_b);
        assert_eq!(a.resumen.acciones_recomendadas, b.resumen.acciones_recomendadas);
    }

    #[tokio::test]
    async fn conteo_de_acciones_recomendadas() {
        // Lote 1: AccionInmediata (PROMOCION) + GestionInventario (REVISION_COMPRAS)
        //         + ProductoLento (REVISION_PRODUCTO, sin ventas).
        // Lote 2: Oportunidad (PLANIFICACION).
        let lotes = vec![lote(1, 5, 50, 60_000), lote(2, 20, 8, 1_000)];
        let mut ventas = HashMap::new();
        ventas.insert(
            2,
            VentasHistoricas {
                total_vendido: 270,
                cantidad_ventas: 90,
            },
        );
        let servicio = servicio(FakeRepo::nuevo(lotes, ventas));

        let resultado = servicio.generar_notificaciones(30).await.unwrap();
        let acciones = resultado.resumen.acciones_recomendadas;

        assert_eq!(acciones.promocion, 1);
        assert_eq!(acciones.revision_compras, 1);
        assert_eq!(acciones.revision_producto, 1);
        assert_eq!(acciones.planificacion, 1);
    }

    #[tokio::test]
    async fn prediccion_devuelve_recomendacion_fija() {
        let mut repo = FakeRepo::nuevo(Vec::new(), HashMap::new());
        repo.problematicos = vec![ProductoProblematico {
            producto_id: 1,
            nombre: "Producto 1".to_string(),
            veces_vencido: 3,
            perdida_promedio: Some(Decimal::from(12_000)),
        }];

        let servicio = servicio(repo);
        let prediccion = servicio.predecir_vencimientos_futuros().await.unwrap();

        assert_eq!(prediccion.productos_problematicos.len(), 1);
        assert!(prediccion.productos_alto_riesgo.is_empty());
        assert_eq!(
            prediccion.recomendacion_general,
            "Revisar estrategia de compras para productos con historial de vencimientos"
        );
    }
}
