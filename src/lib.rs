// Trámites Library - connection paperwork back office
// This exposes the core components for testing and integration

pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod email;
pub mod service;
pub mod shutdown;
pub mod store;
pub mod telemetry;
pub mod tramite;
pub mod workflow;
pub mod worklist;

// Re-export key types for easy access
pub use config::TramitesConfig;
pub use database::DatabaseManager;
pub use email::{EmailError, EmailNotifier, NotificationPayload, SendGridClient};
pub use service::{ServiceError, TramiteService};
pub use shutdown::ShutdownCoordinator;
pub use store::{RecordPatch, SqliteTramiteStore, StoreError, TramiteStore};
pub use telemetry::{create_workflow_span, generate_correlation_id, init_telemetry};
pub use tramite::{NewTramite, TemplateKind, Tramite, TramiteKind, TramiteStatus};
pub use workflow::{NotificationOutcome, StatusUpdate, StatusWorkflow, UpdateOutcome};
pub use worklist::{paginate, Page, WorklistFilter};
