use anyhow::Result;
use clap::Parser;
use tracing::info;

use tramites::cli::commands::{
    delete::DeleteCommand, init_config::InitConfigCommand, list::ListCommand,
    lookup::LookupCommand, serve::ServeCommand, set_cups::SetCupsCommand, show::ShowCommand,
    show_usage, update_status::UpdateStatusCommand,
};
use tramites::cli::{Cli, Commands};
use tramites::{init_telemetry, TramitesConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file = TramitesConfig::load_env_file()?;
    let config = TramitesConfig::load()?;
    init_telemetry(&config.observability)?;
    if let Some(path) = env_file {
        info!("Loaded environment variables from {}", path.display());
    }

    match cli.command {
        // No subcommand: explain what is available
        None => show_usage(),
        Some(Commands::Serve { bind }) => ServeCommand::new(bind).execute(&config).await,
        Some(Commands::List {
            case_number,
            client,
            cups,
            status,
            page,
            per_page,
        }) => {
            ListCommand::new(case_number, client, cups, status)
                .with_page(page, per_page)
                .execute(&config)
                .await
        }
        Some(Commands::Show { id }) => ShowCommand::new(id).execute(&config).await,
        Some(Commands::UpdateStatus {
            id,
            status,
            case_number,
            notify,
            template,
            message,
        }) => {
            UpdateStatusCommand::new(id, status, case_number, notify, template, message)
                .execute(&config)
                .await
        }
        Some(Commands::SetCups { id, cups }) => {
            SetCupsCommand::new(id, cups).execute(&config).await
        }
        Some(Commands::Delete { id }) => DeleteCommand::new(id).execute(&config).await,
        Some(Commands::Lookup { by, value }) => LookupCommand::new(by, value).execute(&config).await,
        Some(Commands::InitConfig { path, force }) => {
            InitConfigCommand::new(path, force).execute(&config)
        }
    }
}
