use anyhow::Result;

use super::with_service;
use crate::config::TramitesConfig;
use crate::tramite::{Tramite, TramiteStatus};
use crate::worklist::WorklistFilter;

pub struct ListCommand {
    pub filter: WorklistFilter,
    pub page: usize,
    pub per_page: Option<usize>,
}

impl ListCommand {
    pub fn new(
        case_number: Option<String>,
        client: Option<String>,
        cups: Option<String>,
        status: Option<TramiteStatus>,
    ) -> Self {
        Self {
            filter: WorklistFilter {
                case_number,
                client_name: client,
                cups,
                status,
            },
            page: 1,
            per_page: None,
        }
    }

    pub fn with_page(mut self, page: usize, per_page: Option<usize>) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    pub async fn execute(&self, config: &TramitesConfig) -> Result<()> {
        with_service(config, |service| async move {
            let page = service
                .worklist(&self.filter, Some(self.page), self.per_page)
                .await?;

            if page.total == 0 {
                println!("📋 No trámites match the current filters");
                return Ok(());
            }
            if page.items.is_empty() {
                println!(
                    "📋 Page {} is past the end ({} pages)",
                    page.page, page.total_pages
                );
                return Ok(());
            }

            println!(
                "📋 Showing {} to {} of {} trámites (page {}/{})",
                page.first_index, page.last_index, page.total, page.page, page.total_pages
            );
            println!();
            for tramite in &page.items {
                println!("{}", summary_line(tramite));
            }
            Ok(())
        })
        .await
    }
}

fn summary_line(tramite: &Tramite) -> String {
    format!(
        "  #{:<5} {:<16} {:<24} {:<22} {}",
        tramite.id,
        tramite.assigned_case_number().unwrap_or("-"),
        tramite.client_name,
        tramite.cups,
        tramite.status
    )
}
