use anyhow::{bail, Result};
use std::path::Path;

use crate::config::TramitesConfig;
use crate::email::TemplateRegistry;

pub struct InitConfigCommand {
    pub path: String,
    pub force: bool,
}

impl InitConfigCommand {
    pub fn new(path: String, force: bool) -> Self {
        Self { path, force }
    }

    pub fn execute(&self, config: &TramitesConfig) -> Result<()> {
        if Path::new(&self.path).exists() && !self.force {
            println!("❌ {} already exists", self.path);
            println!("   💡 Use --force to overwrite it");
            bail!("configuration file {} already exists", self.path);
        }

        let mut config = config.clone();
        // Secrets stay in the environment.
        config.email.api_key = None;
        config.save_to_file(&self.path)?;

        println!("⚙️  Wrote {}", self.path);
        if !TemplateRegistry::new(config.email.templates.clone())
            .missing()
            .is_empty()
        {
            println!("   💡 Fill in [email.templates] with your SendGrid template ids");
        }
        println!("   💡 Set SENDGRID_API_KEY in the environment or .env");
        Ok(())
    }
}
