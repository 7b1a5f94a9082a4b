use clap::{Parser, Subcommand};

use crate::service::LookupKey;
use crate::tramite::{TemplateKind, TramiteStatus};

pub mod commands;

#[derive(Parser)]
#[command(name = "tramites")]
#[command(about = "Back office for utility-connection paperwork")]
#[command(long_about = "Tracks connection requests (trámites) through their processing states, \
                       notifies requesters by email on key transitions and serves the staff \
                       dashboard API. Start the API with 'tramites serve'.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API until interrupted
    Serve {
        /// Override the configured listen address
        #[arg(long, help = "Address to bind, e.g. 0.0.0.0:5000")]
        bind: Option<String>,
    },
    /// Show one page of the worklist
    List {
        /// Case number contains
        #[arg(long, help = "Filter by case number substring (case-insensitive)")]
        case_number: Option<String>,
        /// Client name contains
        #[arg(long, help = "Filter by client name substring (case-insensitive)")]
        client: Option<String>,
        /// CUPS contains
        #[arg(long, help = "Filter by CUPS substring (case-insensitive)")]
        cups: Option<String>,
        /// Exact processing status
        #[arg(long, help = "Filter by exact status, e.g. 'Gestión de Pago'")]
        status: Option<TramiteStatus>,
        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: usize,
        /// Records per page (defaults to the configured page size)
        #[arg(long)]
        per_page: Option<usize>,
    },
    /// Show every field of one trámite
    Show {
        /// Record id
        id: i64,
    },
    /// Change status and/or case number, optionally notifying the requester
    UpdateStatus {
        /// Record id
        id: i64,
        /// New processing status
        #[arg(long, help = "New status, e.g. 'Finalizado'")]
        status: Option<TramiteStatus>,
        /// New case number
        #[arg(long, help = "Case number to assign (empty string clears it)")]
        case_number: Option<String>,
        /// Send the templated email after saving
        #[arg(long, help = "Email the requester after the update is saved")]
        notify: bool,
        /// Template kind to send
        #[arg(long, help = "finalizado, incidencia or pago (inferred from the status when omitted)")]
        template: Option<TemplateKind>,
        /// Free text for incident emails
        #[arg(long, help = "Incident details included verbatim in the email")]
        message: Option<String>,
    },
    /// Replace the CUPS code of a trámite
    SetCups {
        /// Record id
        id: i64,
        /// New CUPS code
        cups: String,
    },
    /// Permanently delete a trámite
    Delete {
        /// Record id
        id: i64,
    },
    /// Public status lookup by case number or email
    Lookup {
        /// expediente or email
        #[arg(help = "Lookup key: expediente or email")]
        by: LookupKey,
        /// Value to search for
        value: String,
    },
    /// Write a configuration file with the current effective settings
    InitConfig {
        /// Destination path
        #[arg(long, default_value = "tramites.toml")]
        path: String,
        /// Overwrite an existing file
        #[arg(long, help = "Overwrite the file if it already exists")]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_status_parses_typed_arguments() {
        let cli = Cli::try_parse_from([
            "tramites",
            "update-status",
            "7",
            "--status",
            "Solicitud de Incidencia",
            "--notify",
            "--message",
            "Falta el DNI",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::UpdateStatus {
                id,
                status,
                notify,
                template,
                message,
                ..
            }) => {
                assert_eq!(id, 7);
                assert_eq!(status, Some(TramiteStatus::IncidentRequest));
                assert!(notify);
                assert_eq!(template, None);
                assert_eq!(message.as_deref(), Some("Falta el DNI"));
            }
            _ => panic!("expected update-status"),
        }
    }

    #[test]
    fn test_unknown_status_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["tramites", "list", "--status", "Completado"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_key_argument() {
        let cli = Cli::try_parse_from(["tramites", "lookup", "email", "a@example.com"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Lookup {
                by: LookupKey::Email,
                ..
            })
        ));
    }
}
