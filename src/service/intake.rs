use serde::Deserialize;
use thiserror::Error;

use crate::tramite::{Documents, KindDetails, NewTramite, TramiteKind, UnknownKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Falta el campo requerido: {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    InvalidKind(#[from] UnknownKind),
}

/// Raw intake form as submitted by the public forms.
///
/// Everything is optional here so that a missing field can be reported by
/// name instead of as a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    pub numero_expediente: Option<String>,
    pub tipo: Option<String>,
    pub formulario: Option<String>,
    pub nombre_cliente: Option<String>,
    pub email: Option<String>,
    pub telefono_movil: Option<String>,
    pub cups: Option<String>,
    pub direccion: Option<String>,
    pub ref_catastral: Option<String>,
    pub tension: Option<String>,
    pub potencia_numerica: Option<String>,
    #[serde(flatten)]
    pub details: KindDetails,
    #[serde(flatten)]
    pub documents: Documents,
}

impl IntakeForm {
    pub fn into_new_tramite(self) -> Result<NewTramite, IntakeError> {
        let kind: TramiteKind = required(self.tipo, "tipo")?.parse()?;

        Ok(NewTramite {
            case_number: self.numero_expediente,
            kind,
            form_label: self.formulario.unwrap_or_default(),
            client_name: required(self.nombre_cliente, "nombreCliente")?,
            email: required(self.email, "email")?,
            phone: required(self.telefono_movil, "telefonoMovil")?,
            cups: required(self.cups, "cups")?,
            address: required(self.direccion, "direccion")?,
            cadastral_ref: required(self.ref_catastral, "refCatastral")?,
            voltage: self.tension,
            power: required(self.potencia_numerica, "potenciaNumerica")?,
            details: self.details.normalized_for(kind),
            documents: self.documents,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, IntakeError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(IntakeError::MissingField(field)),
    }
}

/// Re-check an already typed intake record.
pub fn validate(new: &NewTramite) -> Result<(), IntakeError> {
    let fields = [
        (&new.client_name, "nombreCliente"),
        (&new.email, "email"),
        (&new.phone, "telefonoMovil"),
        (&new.cups, "cups"),
        (&new.address, "direccion"),
        (&new.cadastral_ref, "refCatastral"),
        (&new.power, "potenciaNumerica"),
    ];
    for (value, field) in fields {
        if value.trim().is_empty() {
            return Err(IntakeError::MissingField(field));
        }
    }
    Ok(())
}
