// src/services/clientes_service.rs

use crate::{
    common::error::AppError,
    db::ClientesRepository,
    models::clientes::{Cliente, NuevoCliente},
};

#[derive(Clone)]
pub struct ClientesService {
    repo: ClientesRepository,
}

impl ClientesService {
    pub fn new(repo: ClientesRepository) -> Self {
        Self { repo }
    }

    /// Alta de cliente con su registro de auditoría, en una transacción.
    pub async fn crear_cliente(&self, nuevo: NuevoCliente) -> Result<i32, AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let cliente_id = self.repo.agregar_cliente(&mut *tx, &nuevo).await?;

        let detalle = format!("Cliente creado: {} {}", nuevo.nombre, nuevo.apellido);
        self.repo
            .registrar_auditoria(&mut *tx, cliente_id, "CREAR", &detalle, nuevo.usuario_id)
            .await?;

        tx.commit().await?;

        tracing::info!(cliente_id, "Cliente creado");
        Ok(cliente_id)
    }

    /// Actualiza un cliente y audita campo por campo qué cambió.
    pub async fn actualizar_cliente(
        &self,
        cliente_id: i32,
        cambios: NuevoCliente,
    ) -> Result<(), AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let anterior = self
            .repo
            .obtener_por_id(&mut *tx, cliente_id)
            .await?
            .ok_or(AppError::NoEncontrado("Cliente"))?;

        self.repo
            .actualizar_cliente(&mut *tx, cliente_id, &cambios)
            .await?;

        let detalle = detalle_de_cambios(&anterior, &cambios);
        self.repo
            .registrar_auditoria(
                &mut *tx,
                cliente_id,
                "ACTUALIZAR",
                &detalle,
                cambios.usuario_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(cliente_id, "Cliente actualizado");
        Ok(())
    }

    /// Borrado lógico con auditoría.
    pub async fn eliminar_cliente(
        &self,
        cliente_id: i32,
        usuario_id: Option<i32>,
    ) -> Result<(), AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let filas = self.repo.eliminar_cliente(&mut *tx, cliente_id).await?;
        if filas == 0 {
            return Err(AppError::NoEncontrado("Cliente"));
        }

        self.repo
            .registrar_auditoria(
                &mut *tx,
                cliente_id,
                "ELIMINAR",
                "Cliente eliminado",
                usuario_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(cliente_id, "Cliente eliminado");
        Ok(())
    }
}

/// Describe los cambios entre el cliente guardado y los datos nuevos,
/// un campo por cláusula, separados por "; ".
fn detalle_de_cambios(anterior: &Cliente, cambios: &NuevoCliente) -> String {
    let mut partes = Vec::new();

    if anterior.nombre != cambios.nombre {
        partes.push(format!("Nombre: '{}' -> '{}'", anterior.nombre, cambios.nombre));
    }
    if anterior.apellido != cambios.apellido {
        partes.push(format!(
            "Apellido: '{}' -> '{}'",
            anterior.apellido, cambios.apellido
        ));
    }
    if anterior.dni != cambios.dni {
        partes.push(format!(
            "DNI: '{}' -> '{}'",
            anterior.dni.as_deref().unwrap_or("-"),
            cambios.dni.as_deref().unwrap_or("-"),
        ));
    }
    if anterior.obra_social_id != cambios.obra_social_id {
        partes.push(format!(
            "Obra social: {:?} -> {:?}",
            anterior.obra_social_id, cambios.obra_social_id
        ));
    }
    if anterior.ciudad_id != cambios.ciudad_id {
        partes.push(format!(
            "Ciudad: {:?} -> {:?}",
            anterior.ciudad_id, cambios.ciudad_id
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

    fn cliente_base() -> Cliente {
        Cliente {
            cliente_id: 1,
            nombre: "María".to_string(),
            apellido: "González".to_string(),
            dni: Some("30123456".to_string()),
            obra_social_id: Some(3),
            obra_social: Some("OSDE".to_string()),
            ciudad_id: Some(1),
            ciudad: Some("Rosario".to_string()),
        }
    }

    fn cambios_identicos() -> NuevoCliente {
        NuevoCliente {
            nombre: "María".to_string(),
            apellido: "González".to_string(),
            dni: Some("30123456".to_string()),
            obra_social_id: Some(3),
            ciudad_id: Some(1),
            usuario_id: None,
        }
    }

    #[test]
    fn sin_cambios_se_deja_constancia() {
        let detalle = detalle_de_cambios(&cliente_base(), &cambios_identicos());
        assert_eq!(detalle, "Sin cambios");
    }

    #[test]
    fn cada_campo_modificado_aparece_en_el_detalle() {
        let mut cambios = cambios_identicos();
        cambios.apellido = "Gómez".to_string();
        cambios.obra_social_id = Some(5);

        let detalle = detalle_de_cambios(&cliente_base(), &cambios);
        assert_eq!(
            detalle,
            "Apellido: 'González' -> 'Gómez'; Obra social: Some(3) -> Some(5)"
        );
    }

    #[test]
    fn dni_ausente_se_muestra_como_guion() {
        let mut cambios = cambios_identicos();
        cambios.dni = None;

        let detalle = detalle_de_cambios(&cliente_base(), &cambios);
        assert_eq!(detalle, "DNI: '30123456' -> '-'");
    }
}
