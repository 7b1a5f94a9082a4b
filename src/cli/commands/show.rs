use anyhow::Result;

use super::with_service;
use crate::config::TramitesConfig;
use crate::email::UNASSIGNED_CASE_NUMBER;
use crate::tramite::Tramite;

pub struct ShowCommand {
    pub id: i64,
}

impl ShowCommand {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    pub async fn execute(&self, config: &TramitesConfig) -> Result<()> {
        with_service(config, |service| async move {
            let tramite = service.get(self.id).await?;
            print_tramite(&tramite);
            Ok(())
        })
        .await
    }
}

pub fn print_tramite(tramite: &Tramite) {
    println!("📄 Trámite #{}", tramite.id);
    println!(
        "   🏷️  Case number: {}",
        tramite.assigned_case_number().unwrap_or(UNASSIGNED_CASE_NUMBER)
    );
    println!("   📌 Status: {}", tramite.status);
    println!("   🔧 Type: {} {}", tramite.kind, tramite.form_label);
    println!("   👤 Client: {} <{}> {}", tramite.client_name, tramite.email, tramite.phone);
    println!("   ⚡ CUPS: {}", tramite.cups);
    println!("   🏠 Address: {}", tramite.address);
    println!("   🗺️  Cadastral ref: {}", tramite.cadastral_ref);
    println!(
        "   🔌 Power: {} kW, voltage: {}",
        tramite.power,
        tramite.voltage.as_deref().unwrap_or("-")
    );
    println!("   📅 Opened: {}", tramite.opened_at.format("%d/%m/%Y %H:%M"));

    let docs = &tramite.documents;
    for (label, doc) in [
        ("DNI", &docs.identity_document),
        ("Authorization", &docs.authorization_form),
        ("Point relation", &docs.point_relation_template),
    ] {
        if let Some(name) = doc.as_deref().filter(|n| !n.is_empty()) {
            println!("   📎 {label}: {name}");
        }
    }
}
