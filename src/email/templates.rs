use crate::config::TemplateIds;
use crate::tramite::TemplateKind;

use super::EmailError;

/// Read-only mapping from template kind to provider template id.
///
/// Built once from configuration at start-up.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    ids: TemplateIds,
}

impl TemplateRegistry {
    pub fn new(ids: TemplateIds) -> Self {
        Self { ids }
    }

    pub fn resolve(&self, kind: TemplateKind) -> Result<&str, EmailError> {
        self.ids
            .get(kind)
            .ok_or(EmailError::TemplateNotConfigured { kind })
    }

    /// Kinds with no template id, for start-up warnings.
    pub fn missing(&self) -> Vec<TemplateKind> {
        TemplateKind::ALL
            .into_iter()
            .filter(|kind| self.ids.get(*kind).is_none())
            .collect()
    }
}
