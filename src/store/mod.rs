//! Trámite record store.
//!
//! The workflow and service layers only see the [`TramiteStore`] trait so
//! they can be exercised against mocks; [`SqliteTramiteStore`] is the real
//! backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::tramite::{NewTramite, Tramite, TramiteStatus};

pub mod sqlite;

pub use sqlite::SqliteTramiteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tramite {id} not found")]
    NotFound { id: i64 },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("tramite {id} has an unreadable {field}: {message}")]
    Corrupt {
        id: i64,
        field: &'static str,
        message: String,
    },
}

/// The subset of fields staff can edit after intake.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub case_number: Option<String>,
    pub status: Option<TramiteStatus>,
    pub cups: Option<String>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.case_number.is_none() && self.status.is_none() && self.cups.is_none()
    }

    /// Apply the patch to an in-memory copy of the record.
    pub fn apply_to(&self, tramite: &mut Tramite) {
        if let Some(case_number) = &self.case_number {
            tramite.case_number = Some(case_number.clone());
        }
        if let Some(status) = self.status {
            tramite.status = status;
        }
        if let Some(cups) = &self.cups {
            tramite.cups = cups.clone();
        }
    }
}

/// Persistence operations on trámites
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TramiteStore: Send + Sync {
    /// Insert a new record and return it with its assigned id
    async fn insert(
        &self,
        new: &NewTramite,
        opened_at: DateTime<Utc>,
    ) -> Result<Tramite, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Tramite>, StoreError>;

    /// All records in store order (ascending id)
    async fn list(&self) -> Result<Vec<Tramite>, StoreError>;

    /// Write only the fields present in `patch`.
    ///
    /// Fails with [`StoreError::NotFound`] when no row has `id`.
    async fn update_fields(&self, id: i64, patch: &RecordPatch) -> Result<(), StoreError>;

    /// Hard delete. Returns false when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn find_by_case_number(&self, case_number: &str)
        -> Result<Option<Tramite>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Tramite>, StoreError>;
}
