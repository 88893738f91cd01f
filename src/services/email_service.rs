// src/services/email_service.rs
//
// Envío de alertas críticas por SMTP. Si faltan las variables de
// entorno el servicio queda deshabilitado y los envíos se omiten,
// nunca es un error de arranque.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::{
    common::error::AppError,
    models::vencimientos::{LoteAnalizado, ResultadoNotificaciones},
};

#[derive(Clone)]
pub struct EmailService {
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
    remitente: Option<Mailbox>,
    destinatarios: Vec<Mailbox>,
}

impl EmailService {
    /// Arma el transporte a partir de SMTP_HOST / SMTP_USER / SMTP_PASS /
    /// SMTP_PORT y la lista EMAIL_ALERTAS_DESTINATARIOS (separada por comas).
    pub fn from_env() -> Result<Self, AppError> {
        let host = std::env::var("SMTP_HOST").ok();
        let user = std::env::var("SMTP_USER").ok();
        let pass = std::env::var("SMTP_PASS").ok();

        let (Some(host), Some(user), Some(pass)) = (host, user, pass) else {
            tracing::warn!(
                "⚠️ SMTP no configurado. Las notificaciones por email no estarán disponibles."
            );
            return Ok(Self {
                mailer: None,
                remitente: None,
                destinatarios: Vec::new(),
            });
        };

        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(587);

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
            .map_err(anyhow::Error::from)?
            .port(port)
            .credentials(Credentials::new(user.clone(), pass))
            .build();

        let remitente = format!("FarmaGest - Alertas <{user}>")
            .parse::<Mailbox>()
            .map_err(anyhow::Error::from)?;

        let destinatarios = std::env::var("EMAIL_ALERTAS_DESTINATARIOS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .filter_map(|d| match d.parse::<Mailbox>() {
                Ok(mailbox) => Some(mailbox),
                Err(_) => {
                    tracing::warn!(destinatario = %d, "Destinatario de alertas inválido, ignorado");
                    None
                }
            })
            .collect();

        tracing::info!("✅ Servicio de email configurado");

        Ok(Self {
            mailer: Some(mailer),
            remitente: Some(remitente),
            destinatarios,
        })
    }

    /// Envía la alerta de vencimientos. Devuelve `false` si el servicio
    /// está deshabilitado o no hay destinatarios configurados.
    pub async fn enviar_alerta_vencimientos(
        &self,
        resultado: &ResultadoNotificaciones,
    ) -> Result<bool, AppError> {
        let (Some(mailer), Some(remitente)) = (&self.mailer, &self.remitente) else {
            tracing::warn!("Email no configurado, omitiendo envío");
            return Ok(false);
        };

        if self.destinatarios.is_empty() {
            tracing::warn!("No hay destinatarios configurados para alertas");
            return Ok(false);
        }

        let asunto = format!(
            "🚨 ALERTA CRÍTICA: {} lotes vencidos detectados",
            resultado.resumen.lotes_vencidos
        );
        let texto = cuerpo_texto(resultado);
        let html = cuerpo_html(resultado);

        let mut builder = Message::builder().from(remitente.clone()).subject(asunto.clone());
        for destinatario in &self.destinatarios {
            builder = builder.to(destinatario.clone());
        }

        let mensaje = builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(texto),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .map_err(anyhow::Error::from)?;

        mailer.send(mensaje).await.map_err(anyhow::Error::from)?;

        tracing::info!(
            destinatarios = self.destinatarios.len(),
            asunto = %asunto,
            "✅ Email de alerta enviado"
        );

        Ok(true)
    }
}

fn cuerpo_texto(resultado: &ResultadoNotificaciones) -> String {
    let resumen = &resultado.resumen;

    let mut texto = format!(
        "🚨 ALERTAS CRÍTICAS DE VENCIMIENTOS\n\
         ====================================\n\n\
         RESUMEN EJECUTIVO:\n\
         - Total lotes en riesgo: {}\n\
         - Valor total en riesgo: ${}\n\
         - Lotes vencidos: {}\n\
         - Lotes alta prioridad: {}\n\
         - Tendencia: {}\n",
        resumen.total_lotes_en_riesgo,
        resumen.valor_total_inventario_riesgo,
        resumen.lotes_vencidos,
        resumen.lotes_alta_prioridad,
        resumen.tendencia,
    );

    agregar_seccion_texto(&mut texto, "🔴 ALERTAS CRÍTICAS", &resultado.notificaciones.criticas);
    agregar_seccion_texto(&mut texto, "🟠 ALTA PRIORIDAD", &resultado.notificaciones.alta);

    texto.push_str("\n\nEste es un email automático generado por FarmaGest.\n");
    texto
}

fn agregar_seccion_texto(texto: &mut String, titulo: &str, lotes: &[LoteAnalizado]) {
    if lotes.is_empty() {
        return;
    }

    texto.push_str(&format!("\n{titulo} ({}):\n", lotes.len()));
    for analizado in lotes.iter().take(10) {
        texto.push_str(&format!(
            "\n- {} ({})\n  Días restantes: {}\n  Valor: ${}\n  Score urgencia: {}/100\n",
            analizado.lote.producto_nombre,
            analizado.lote.numero_lote,
            analizado.lote.dias_restantes,
            analizado.lote.valor_inventario,
            analizado.score_urgencia,
        ));
        for recomendacion in &analizado.recomendaciones {
            texto.push_str(&format!("  💡 {}\n", recomendacion.mensaje()));
        }
    }
}

fn cuerpo_html(resultado: &ResultadoNotificaciones) -> String {
    let resumen = &resultado.resumen;

    let mut filas = String::new();
    for analizado in resultado
        .notificaciones
        .criticas
        .iter()
        .chain(resultado.notificaciones.alta.iter())
        .take(20)
    {
        filas.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>${}</td><td>{}/100</td></tr>",
            analizado.lote.producto_nombre,
            analizado.lote.numero_lote,
            analizado.lote.dias_restantes,
            analizado.lote.valor_inventario,
            analizado.score_urgencia,
        ));
    }

    format!(
        "<!DOCTYPE html><html><body style=\"font-family: Arial, sans-serif; color: #333;\">\
         <h1 style=\"background-color: #dc2626; color: white; padding: 16px;\">\
         🚨 ALERTAS CRÍTICAS DE VENCIMIENTOS</h1>\
         <h2>Resumen Ejecutivo</h2>\
         <ul>\
         <li>Lotes en riesgo: <strong>{}</strong></li>\
         <li>Valor en riesgo: <strong>${}</strong></li>\
         <li>Lotes vencidos: <strong>{}</strong></li>\
         <li>Lotes alta prioridad: <strong>{}</strong></li>\
         <li>Tendencia: <strong>{}</strong></li>\
         </ul>\
         <h2>Lotes que requieren acción</h2>\
         <table border=\"1\" cellpadding=\"8\" cellspacing=\"0\">\
         <tr><th>Producto</th><th>Lote</th><th>Días restantes</th><th>Valor</th><th>Score</th></tr>\
         {}\
         </table>\
         <p style=\"color: #6b7280; font-size: 12px;\">\
         Este es un email automático generado por FarmaGest.</p>\
         </body></html>",
        resumen.total_lotes_en_riesgo,
        resumen.valor_total_inventario_riesgo,
        resumen.lotes_vencidos,
        resumen.lotes_alta_prioridad,
        resumen.tendencia,
        filas,
    )
}
