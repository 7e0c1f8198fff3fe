use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::gateway::{rest, AuthGateway};

const PASSWORD_ENV: &str = "PORTFOLIO_ADMIN_PASSWORD";

pub async fn login(
    config: &AppConfig,
    email: String,
    password: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let password = password
        .or_else(|| std::env::var(PASSWORD_ENV).ok())
        .ok_or_else(|| anyhow::anyhow!("No password given; pass --password or set {}", PASSWORD_ENV))?;

    let (_, auth) = rest::gateways(config)?;
    let session = auth.sign_in(&email, &password).await?;

    output_success(
        &output_format,
        &format!("Signed in as {}", email),
        Some(json!({
            "user_id": session.user_id,
            "email": session.email,
            "expires_at": session.expires_at,
        })),
    )
}

pub async fn logout(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, auth) = rest::gateways(config)?;
    auth.sign_out().await?;
    output_success(&output_format, "Signed out", None)
}
