// src/services/productos_service.rs

use crate::{
    common::error::AppError,
    db::ProductosRepository,
    models::productos::{NuevoProducto, Producto},
};

#[derive(Clone)]
pub struct ProductosService {
    repo: ProductosRepository,
}

impl ProductosService {
    pub fn new(repo: ProductosRepository) -> Self {
        Self { repo }
    }

    /// Alta de producto con su registro de auditoría, en una transacción.
    pub async fn crear_producto(&self, nuevo: NuevoProducto) -> Result<i32, AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let producto_id = self.repo.agregar_producto(&mut *tx, &nuevo).await?;

        let detalle = format!("Producto creado: {} ({})", nuevo.nombre, nuevo.codigo);
        self.repo
            .registrar_auditoria(&mut *tx, producto_id, "CREAR", &detalle, nuevo.usuario_id)
            .await?;

        tx.commit().await?;

        tracing::info!(producto_id, "Producto creado");
        Ok(producto_id)
    }

    /// Actualiza un producto y audita campo por campo qué cambió.
    pub async fn actualizar_producto(
        &self,
        producto_id: i32,
        cambios: NuevoProducto,
    ) -> Result<(), AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let anterior = self
            .repo
            .obtener_por_id(&mut *tx, producto_id)
            .await?
            .ok_or(AppError::NoEncontrado("Producto"))?;

        self.repo
            .actualizar_producto(&mut *tx, producto_id, &cambios)
            .await?;

        let detalle = detalle_de_cambios(&anterior, &cambios);
        self.repo
            .registrar_auditoria(
                &mut *tx,
                producto_id,
                "ACTUALIZAR",
                &detalle,
                cambios.usuario_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(producto_id, "Producto actualizado");
        Ok(())
    }

    /// Borrado lógico con auditoría.
    pub async fn eliminar_producto(
        &self,
        producto_id: i32,
        usuario_id: Option<i32>,
    ) -> Result<(), AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let filas = self.repo.eliminar_producto(&mut *tx, producto_id).await?;
        if filas == 0 {
            return Err(AppError::NoEncontrado("Producto"));
        }

        self.repo
            .registrar_auditoria(
                &mut *tx,
                producto_id,
                "ELIMINAR",
                "Producto eliminado",
                usuario_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(producto_id, "Producto eliminado");
        Ok(())
    }
}

/// Describe los cambios entre el producto guardado y los datos nuevos,
/// un campo por cláusula, separados por "; ".
fn detalle_de_cambios(anterior: &Producto, cambios: &NuevoProducto) -> String {
    let mut partes = Vec::new();

    if anterior.nombre != cambios.nombre {
        partes.push(format!("Nombre: '{}' -> '{}'", anterior.nombre, cambios.nombre));
    }
    if anterior.codigo != cambios.codigo {
        partes.push(format!("Código: '{}' -> '{}'", anterior.codigo, cambios.codigo));
    }
    if anterior.marca != cambios.marca {
        partes.push(format!(
            "Marca: '{}' -> '{}'",
            anterior.marca.as_deref().unwrap_or("-"),
            cambios.marca.as_deref().unwrap_or("-"),
        ));
    }
    if anterior.categoria_id != cambios.categoria_id {
        partes.push(format!(
            "Categoría: {:?} -> {:?}",
            anterior.categoria_id, cambios.categoria_id
        ));
    }
    if anterior.stock != cambios.stock {
        partes.push(format!("Stock: {} -> {}", anterior.stock, cambios.stock));
    }
    if anterior.precio != cambios.precio {
        partes.push(format!(
            "Precio: {} -> {}",
            anterior
                .precio
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            cambios
                .precio
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ));
    }

    if partes.is_empty() {
        "Sin cambios".to_string()
    } else {
        partes.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn producto_base() -> Producto {
        Producto {
            producto_id: 1,
            nombre: "Ibuprofeno 400mg".to_string(),
            codigo: "IBU-400".to_string(),
            marca: Some("Genérico".to_string()),
            categoria_id: Some(2),
            categoria_nombre: Some("Analgésicos".to_string()),
            stock: 100,
            precio: Some(Decimal::from(1500)),
        }
    }

    fn cambios_identicos() -> NuevoProducto {
        NuevoProducto {
            nombre: "Ibuprofeno 400mg".to_string(),
            codigo: "IBU-400".to_string(),
            marca: Some("Genérico".to_string()),
            categoria_id: Some(2),
            stock: 100,
            precio: Some(Decimal::from(1500)),
            usuario_id: None,
        }
    }

    #[test]
    fn sin_cambios_se_deja_constancia() {
        let detalle = detalle_de_cambios(&producto_base(), &cambios_identicos());
        assert_eq!(detalle, "Sin cambios");
    }

    #[test]
    fn cada_campo_modificado_aparece_en_el_detalle() {
        let mut cambios = cambios_identicos();
        cambios.nombre = "Ibuprofeno 600mg".to_string();
        cambios.stock = 80;

        let detalle = detalle_de_cambios(&producto_base(), &cambios);
        assert_eq!(
            detalle,
            "Nombre: 'Ibuprofeno 400mg' -> 'Ibuprofeno 600mg'; Stock: 100 -> 80"
        );
    }

    #[test]
    fn marca_ausente_se_muestra_como_guion() {
        let mut cambios = cambios_identicos();
        cambios.marca = None;

        let detalle = detalle_de_cambios(&producto_base(), &cambios);
        assert_eq!(detalle, "Marca: 'Genérico' -> '-'");
    }
}
