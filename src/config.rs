use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::tramite::TemplateKind;

const DEFAULT_SENDER: &str = "no-reply@tramites.com";

/// Main configuration structure for the trámites service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TramitesConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Database settings
    pub database: DatabaseConfig,
    /// Transactional email provider settings
    pub email: EmailConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the HTTP API listens on
    pub bind_address: String,
    /// Worklist page size when the caller does not ask for one
    pub default_page_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL (SQLite file path or connection string)
    pub url: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Enable automatic migrations
    pub auto_migrate: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// SendGrid API key (can be set via env var)
    pub api_key: Option<String>,
    /// From address on outgoing notifications
    pub sender: String,
    /// Provider base URL, overridable for testing
    pub api_base_url: String,
    /// Request timeout for a single send
    pub timeout_seconds: u64,
    /// Provider template ids per template kind
    pub templates: TemplateIds,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TemplateIds {
    pub finalizado: Option<String>,
    pub incidencia: Option<String>,
    pub pago: Option<String>,
}

impl TemplateIds {
    pub fn get(&self, kind: TemplateKind) -> Option<&str> {
        let id = match kind {
            TemplateKind::Finalizado => &self.finalizado,
            TemplateKind::Incidencia => &self.incidencia,
            TemplateKind::Pago => &self.pago,
        };
        id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON structured logs instead of plain text
    pub json_logs: bool,
}

impl Default for TramitesConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1:5000".to_string(),
                default_page_size: 20,
            },
            database: DatabaseConfig {
                url: "sqlite://tramites.db".to_string(),
                max_connections: 10,
                auto_migrate: true,
            },
            email: EmailConfig {
                api_key: None, // Will be read from env var or .tramites-rc
                sender: DEFAULT_SENDER.to_string(),
                api_base_url: "https://api.sendgrid.com".to_string(),
                timeout_seconds: 30,
                templates: TemplateIds::default(),
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: true,
            },
        }
    }
}

impl TramitesConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (tramites.toml, .tramites-rc)
    /// 3. Environment variables (prefixed with TRAMITES__)
    /// 4. Legacy deployment variables for unset secrets (SENDGRID_API_KEY, ...)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if Path::new("tramites.toml").exists() {
            builder = builder.add_source(File::with_name("tramites"));
        }

        if Path::new(".tramites-rc").exists() {
            builder = builder.add_source(File::with_name(".tramites-rc").format(config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("TRAMITES")
                .separator("__")
                .try_parsing(true),
        );

        let mut tramites_config: TramitesConfig = builder.build()?.try_deserialize()?;
        tramites_config.apply_legacy_env(|key| std::env::var(key).ok());

        Ok(tramites_config)
    }

    /// Fill unset email settings from the legacy SendGrid variable names.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = &mut self.email;

        if email.api_key.is_none() {
            email.api_key = lookup("SENDGRID_API_KEY");
        }
        if email.sender == DEFAULT_SENDER {
            if let Some(sender) = lookup("EMAIL_FROM") {
                email.sender = sender;
            }
        }

        let templates = &mut email.templates;
        if templates.finalizado.is_none() {
            templates.finalizado = lookup("SENDGRID_TEMPLATE_FINALIZADO");
        }
        if templates.incidencia.is_none() {
            templates.incidencia = lookup("SENDGRID_TEMPLATE_INCIDENCIA");
        }
        if templates.pago.is_none() {
            templates.pago = lookup("SENDGRID_TEMPLATE_PAGO");
        }
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists. Runs before logging is initialised, so
    /// the caller logs the returned path once telemetry is up.
    pub fn load_env_file() -> Result<Option<PathBuf>> {
        Self::load_env_file_in(Path::new("."))
    }

    pub fn load_env_file_in(dir: &Path) -> Result<Option<PathBuf>> {
        let path = dir.join(".env");
        if !path.exists() {
            return Ok(None);
        }
        dotenvy::from_path(&path)?;
        Ok(Some(path))
    }
}
