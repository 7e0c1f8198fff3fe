use clap::Parser;
use tracing_subscriber::EnvFilter;

use portfolio_admin::cli::utils::output_error;
use portfolio_admin::cli::{run, Cli, OutputFormat, Reported};
use portfolio_admin::config::AppConfig;
use portfolio_admin::AdminError;

#[tokio::main]
async fn main() {
    // Load .env if present so PORTFOLIO_BACKEND_URL and friends can live there
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::from_env();
    tracing::debug!("Running in {:?} mode", config.environment);

    let output_format = OutputFormat::from_cli(&cli);
    if let Err(e) = run(cli, config).await {
        // Already shown through the notifier
        if e.is::<Reported>() {
            std::process::exit(1);
        }
        let code = e.downcast_ref::<AdminError>().map(AdminError::error_code);
        let _ = output_error(&output_format, &e.to_string(), code);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
