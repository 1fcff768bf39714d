use console::style;
use placeguide_core::error::CandidateFailure;
use placeguide_core::PlaceguideError;
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
#[derive(Clone)]
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
    pub failures: Vec<CandidateFailure>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
            failures: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn with_failures(mut self, failures: &[CandidateFailure]) -> Self {
        self.failures = failures.to_vec();
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Category table file could not be read
pub fn categories_not_found(path: &Path) -> CliError {
    CliError::new("Category table not found")
        .with_context(format!(
            "Evaluation needs a category table describing each category's policy.\n\nPath: {}",
            path.display()
        ))
        .with_suggestion("Pass one explicitly: placeguide evaluate batch.json --categories categories.toml")
        .with_suggestion("Or set PLACEGUIDE_CATEGORIES, or `categories` in placeguide.toml")
        .with_help("Run: placeguide categories --help")
}

/// No anchor coordinate configured
pub fn missing_anchor() -> CliError {
    CliError::new("No anchor coordinate")
        .with_context("Distance checks are measured from an anchor, and none was configured.")
        .with_suggestion("Pass one: --anchor 59.9139,10.7522")
        .with_suggestion("Or set PLACEGUIDE_ANCHOR=\"59.9139,10.7522\"")
        .with_suggestion("Or add `anchor = { lat = 59.9139, lng = 10.7522 }` to placeguide.toml")
        .with_help("Run: placeguide config")
}

/// Candidate file is not a JSON array of candidates
pub fn invalid_candidates(path: &Path, reason: &str) -> CliError {
    CliError::new("Invalid candidates file")
        .with_context(format!(
            "Expected a JSON array of candidates.\n\nPath: {}\nError: {}",
            path.display(),
            reason
        ))
        .with_suggestion(
            "Each candidate needs id, name, category and coordinate: {\"lat\": .., \"lng\": ..}",
        )
        .with_help("Run: placeguide evaluate --help")
}

/// Batch aborted because some candidates could not be evaluated
pub fn batch_failed(failures: &[CandidateFailure]) -> CliError {
    let listing: Vec<String> = failures.iter().map(|f| format!("  - {}", f)).collect();

    CliError::new(format!("{} candidate(s) could not be evaluated", failures.len()))
        .with_context(listing.join("\n"))
        .with_failures(failures)
        .with_suggestion("Fix the listed candidates, or add missing categories to the table")
        .with_suggestion("Or run with --error-policy skip to record failures and continue")
        .with_help("Run: placeguide categories")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check placeguide.toml and the category table for typos")
        .with_suggestion("Check PLACEGUIDE_* environment variables")
        .with_help("Run: placeguide config")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(cli_error) = error.downcast_ref::<CliError>() {
        return cli_error.clone();
    }

    if let Some(engine_error) = error.downcast_ref::<PlaceguideError>() {
        return match engine_error {
            PlaceguideError::ConfigMissing { key } if key == "anchor" => missing_anchor(),
            PlaceguideError::ConfigMissing { key } => {
                invalid_config(key, "a value is required but none was configured")
            }
            PlaceguideError::ConfigInvalid { key, reason } => invalid_config(key, reason),
            PlaceguideError::BatchFailed { failures } => batch_failed(failures),
            other => CliError::new(other.to_string()),
        };
    }

    let message = format!("{:#}", error);
    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.contains("permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
    } else {
        CliError::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_anchor_maps_to_suggestions() {
        let error = anyhow::Error::new(PlaceguideError::ConfigMissing { key: "anchor".to_string() });
        let cli_error = from_anyhow(error);
        assert_eq!(cli_error.message, "No anchor coordinate");
        assert!(cli_error.suggestions.iter().any(|s| s.contains("--anchor")));
    }

    #[test]
    fn test_batch_failed_lists_candidates() {
        let failures = vec![CandidateFailure {
            candidate_id: "x1".to_string(),
            reason: "Unknown category 'spaceport' for candidate x1".to_string(),
        }];
        let error = anyhow::Error::new(PlaceguideError::BatchFailed { failures });
        let cli_error = from_anyhow(error);

        assert!(cli_error.message.starts_with("1 candidate(s)"));
        assert_eq!(cli_error.failures.len(), 1);
        assert_eq!(cli_error.failures[0].candidate_id, "x1");
        assert!(cli_error.context.unwrap().contains("x1"));
    }

    #[test]
    fn test_cli_error_passes_through() {
        let error = anyhow::Error::new(categories_not_found(Path::new("missing.toml")));
        let cli_error = from_anyhow(error);
        assert_eq!(cli_error.message, "Category table not found");
        assert!(cli_error.context.unwrap().contains("missing.toml"));
    }

    #[test]
    fn test_context_wrapped_engine_error_is_found() {
        let error = anyhow::Error::new(PlaceguideError::ConfigInvalid {
            key: "error_policy".to_string(),
            reason: "Use skip or abort".to_string(),
        })
        .context("Failed to load settings");

        let cli_error = from_anyhow(error);
        assert_eq!(cli_error.message, "Invalid configuration: error_policy");
    }
}
