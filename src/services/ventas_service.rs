// src/services/ventas_service.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::VentasRepository,
    models::ventas::{NuevaVenta, VentaConItems},
};

#[derive(Clone)]
pub struct VentasService {
    repo: VentasRepository,
}

impl VentasService {
    pub fn new(repo: VentasRepository) -> Self {
        Self { repo }
    }

    /// Registra una venta completa: cabecera, items y descuento de stock,
    /// todo en una transacción. Si algún producto no alcanza el stock
    /// pedido la venta entera se revierte.
    pub async fn registrar_venta(&self, nueva: NuevaVenta) -> Result<VentaConItems, AppError> {
        if nueva.items.is_empty() {
            return Err(AppError::VentaSinItems);
        }

        let mut tx = self.repo.pool().begin().await?;

        let fecha_hora = nueva.fecha_hora.unwrap_or_else(Utc::now);
        let venta_id = self
            .repo
            .insertar_venta(
                &mut *tx,
                nueva.cliente_id,
                nueva.usuario_id,
                fecha_hora,
                nueva.total,
                nueva.total_sin_descuento,
                nueva.descuento,
            )
            .await?;

        // Número de factura de 9 dígitos, derivado del id si no vino uno.
        let numero_factura = match nueva.numero_factura {
            Some(numero) => format!("{numero:09}"),
            None => format!("{venta_id:09}"),
        };
        self.repo
            .asignar_numero_factura(&mut *tx, venta_id, &numero_factura)
            .await?;

        for item in &nueva.items {
            let disponible = self
                .repo
                .stock_para_venta(&mut *tx, item.producto_id)
                .await?
                .ok_or(AppError::NoEncontrado("Producto"))?;

            if disponible < item.cantidad {
                return Err(AppError::StockInsuficiente {
                    producto_id: item.producto_id,
                    disponible,
                    solicitado: item.cantidad,
                });
            }

            self.repo.insertar_item(&mut *tx, venta_id, item).await?;
            self.repo
                .descontar_stock(&mut *tx, item.producto_id, item.cantidad)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(venta_id, numero_factura = %numero_factura, "Venta registrada");

        self.repo
            .obtener_por_id(venta_id)
            .await?
            .ok_or(AppError::NoEncontrado("Venta"))
    }
}
