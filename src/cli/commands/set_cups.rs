use anyhow::Result;

use super::with_service;
use crate::config::TramitesConfig;

pub struct SetCupsCommand {
    pub id: i64,
    pub cups: String,
}

impl SetCupsCommand {
    pub fn new(id: i64, cups: String) -> Self {
        Self { id, cups }
    }

    pub async fn execute(&self, config: &TramitesConfig) -> Result<()> {
        with_service(config, |service| async move {
            let tramite = service.update_cups(self.id, self.cups.clone()).await?;
            println!("✅ CUPS of trámite #{} set to {}", tramite.id, tramite.cups);
            Ok(())
        })
        .await
    }
}
