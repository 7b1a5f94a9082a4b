pub mod status;
pub mod types;

pub use status::{TemplateKind, TramiteStatus, UnknownStatus, UnknownTemplateKind};
pub use types::{Documents, KindDetails, NewTramite, Tramite, TramiteKind, UnknownKind};
