use colored::*;
use fedcall_core::{CallResult, ResultEnvelope, config::ConfigError, local::LocalCallError};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable result: {e}>"))
}

impl From<CallResult> for FormattedString {
    fn from(result: CallResult) -> Self {
        if result.is_success() {
            FormattedString(pretty(&result))
        } else {
            FormattedString(format!(
                "{} retcode={}\n\n{}",
                "Call Failed:".red().bold(),
                result.retcode,
                pretty(&result)
            ))
        }
    }
}

impl From<ResultEnvelope> for FormattedString {
    fn from(envelope: ResultEnvelope) -> Self {
        FormattedString(pretty(&envelope))
    }
}

impl From<ConfigError> for FormattedString {
    fn from(err: ConfigError) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Invalid configuration:".red().bold(),
            err
        ))
    }
}

impl From<LocalCallError> for FormattedString {
    fn from(err: LocalCallError) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Failed to set up the local HTTP client:".red().bold(),
            err
        ))
    }
}
