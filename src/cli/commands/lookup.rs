use anyhow::Result;

use super::with_service;
use crate::config::TramitesConfig;
use crate::service::{LookupKey, ServiceError, MSG_NO_MATCH};

pub struct LookupCommand {
    pub by: LookupKey,
    pub value: String,
}

impl LookupCommand {
    pub fn new(by: LookupKey, value: String) -> Self {
        Self { by, value }
    }

    pub async fn execute(&self, config: &TramitesConfig) -> Result<()> {
        with_service(config, |service| async move {
            let view = match service.lookup(self.by, &self.value).await {
                Ok(view) => view,
                Err(ServiceError::NoMatch { .. }) => {
                    println!("🔎 {MSG_NO_MATCH}");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            println!("🔎 Expediente #{}", view.id);
            println!(
                "   🏷️  Case number: {}",
                view.numero_expediente.as_deref().unwrap_or("-")
            );
            println!("   🔧 Type: {}", view.tipo);
            println!("   👤 Client: {} <{}>", view.nombre_cliente, view.email);
            println!("   ⚡ CUPS: {}", view.cups);
            println!("   🏠 Address: {}", view.direccion);
            println!("   📌 Status: {}", view.estado);
            println!("   📅 Created: {}", view.fecha_creacion);
            println!("   💬 {}", view.comentarios);
            Ok(())
        })
        .await
    }
}
