use anyhow::Result;

use super::with_service;
use crate::config::TramitesConfig;
use crate::service::MSG_DELETED;

pub struct DeleteCommand {
    pub id: i64,
}

impl DeleteCommand {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    pub async fn execute(&self, config: &TramitesConfig) -> Result<()> {
        with_service(config, |service| async move {
            service.delete(self.id).await?;
            println!("🗑️  {MSG_DELETED} (#{})", self.id);
            Ok(())
        })
        .await
    }
}
