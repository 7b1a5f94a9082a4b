//! Application service composing the store, the status workflow and the
//! read-side helpers. Both the HTTP API and the CLI go through here.

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::email::EmailNotifier;
use crate::store::{RecordPatch, StoreError, TramiteStore};
use crate::tramite::{NewTramite, Tramite};
use crate::workflow::{StatusUpdate, StatusWorkflow, UpdateOutcome, WorkflowError};
use crate::worklist::{paginate, Page, WorklistFilter, DEFAULT_PAGE_SIZE};

pub mod intake;
pub mod lookup;

pub use intake::{IntakeError, IntakeForm};
pub use lookup::{LookupKey, PublicStatus, UnknownLookupKey};

pub const MSG_CREATED: &str = "Trámite creado exitosamente";
pub const MSG_DELETED: &str = "Trámite eliminado correctamente";
pub const MSG_NO_MATCH: &str = "No se encontró ningún expediente con los datos proporcionados";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("tramite {id} not found")]
    NotFound { id: i64 },
    #[error("no tramite matches {key} = {value}")]
    NoMatch { key: LookupKey, value: String },
    #[error("{context}: {source}")]
    Persistence {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    fn persistence(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| match source {
            StoreError::NotFound { id } => ServiceError::NotFound { id },
            source => ServiceError::Persistence { context, source },
        }
    }
}

impl From<WorkflowError> for ServiceError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotFound { id } => ServiceError::NotFound { id },
            WorkflowError::Persistence(source) => ServiceError::Persistence {
                context: crate::workflow::status_update::MSG_UPDATE_FAILED,
                source,
            },
        }
    }
}

impl From<IntakeError> for ServiceError {
    fn from(err: IntakeError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<UnknownLookupKey> for ServiceError {
    fn from(err: UnknownLookupKey) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

#[derive(Clone)]
pub struct TramiteService {
    store: Arc<dyn TramiteStore>,
    workflow: StatusWorkflow,
    default_page_size: usize,
}

impl TramiteService {
    pub fn new(store: Arc<dyn TramiteStore>, notifier: Arc<dyn EmailNotifier>) -> Self {
        let workflow = StatusWorkflow::new(store.clone(), notifier);
        Self {
            store,
            workflow,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size.max(1);
        self
    }

    pub async fn create(&self, new: NewTramite) -> Result<Tramite, ServiceError> {
        intake::validate(&new)?;
        let tramite = self
            .store
            .insert(&new, Utc::now())
            .await
            .map_err(ServiceError::persistence("Error al crear el trámite"))?;
        info!("Tramite {} created ({})", tramite.id, tramite.kind);
        Ok(tramite)
    }

    pub async fn create_from_form(&self, form: IntakeForm) -> Result<Tramite, ServiceError> {
        let new = form.into_new_tramite()?;
        self.create(new).await
    }

    pub async fn get(&self, id: i64) -> Result<Tramite, ServiceError> {
        self.store
            .get(id)
            .await
            .map_err(ServiceError::persistence("Error al obtener el trámite"))?
            .ok_or(ServiceError::NotFound { id })
    }

    pub async fn list(&self) -> Result<Vec<Tramite>, ServiceError> {
        self.store
            .list()
            .await
            .map_err(ServiceError::persistence("Error al obtener los trámites"))
    }

    /// Filter all records and return one page. `None` page arguments fall
    /// back to the first page and the configured page size.
    pub async fn worklist(
        &self,
        filter: &WorklistFilter,
        page: Option<usize>,
        per_page: Option<usize>,
    ) -> Result<Page<Tramite>, ServiceError> {
        let matching = filter.apply(self.list().await?);
        Ok(paginate(
            matching,
            page.unwrap_or(1),
            per_page.unwrap_or(self.default_page_size),
        ))
    }

    pub async fn update_status(
        &self,
        id: i64,
        update: StatusUpdate,
    ) -> Result<UpdateOutcome, ServiceError> {
        Ok(self.workflow.update_status(id, update).await?)
    }

    pub async fn update_cups(&self, id: i64, cups: String) -> Result<Tramite, ServiceError> {
        let patch = RecordPatch {
            cups: Some(cups),
            ..RecordPatch::default()
        };
        self.store
            .update_fields(id, &patch)
            .await
            .map_err(ServiceError::persistence("Error al actualizar el trámite"))?;
        info!("Tramite {} CUPS updated", id);
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(ServiceError::persistence("Error al eliminar el trámite"))?;
        if !deleted {
            warn!("Delete requested for missing tramite {}", id);
            return Err(ServiceError::NotFound { id });
        }
        info!("Tramite {} deleted", id);
        Ok(())
    }

    /// First record matching the key, in its public form.
    pub async fn lookup(&self, key: LookupKey, value: &str) -> Result<PublicStatus, ServiceError> {
        let found = match key {
            LookupKey::CaseNumber => self.store.find_by_case_number(value).await,
            LookupKey::Email => self.store.find_by_email(value).await,
        }
        .map_err(ServiceError::persistence("Error al consultar el expediente"))?;

        found
            .as_ref()
            .map(PublicStatus::from)
            .ok_or_else(|| ServiceError::NoMatch {
                key,
                value: value.to_string(),
            })
    }
}
