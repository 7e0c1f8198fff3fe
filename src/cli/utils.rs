use serde_json::{json, Value};
use std::io::{BufRead, Write};

use crate::cli::OutputFormat;
use crate::controller::{Confirm, Notice, NoticeLevel, Notifier};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data) = data {
                response["data"] = data;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });
            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a data payload: the JSON envelope, or the given text rendering
pub fn output_data(output_format: &OutputFormat, data: Value, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "success": true, "data": data }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", text());
        }
    }
    Ok(())
}

/// `label: value` for present values, nothing for blanks
pub fn field_line(label: &str, value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| format!("  {}: {}", label, v))
}

/// Notices go to stderr so stdout stays parseable in JSON mode
pub struct ConsoleNotifier {
    format: OutputFormat,
}

impl ConsoleNotifier {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match self.format {
            OutputFormat::Json => match serde_json::to_string(&json!({ "notice": notice })) {
                Ok(line) => eprintln!("{}", line),
                Err(e) => tracing::error!("Could not encode notice: {}", e),
            },
            OutputFormat::Text => match notice.level {
                NoticeLevel::Success => eprintln!("✓ {}", notice.description),
                NoticeLevel::Error => eprintln!("✗ {}: {}", notice.title, notice.description),
            },
        }
    }
}

/// Asks on the terminal; `--yes` answers for the user
pub struct PromptConfirm {
    assume_yes: bool,
}

impl PromptConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", prompt);
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}
