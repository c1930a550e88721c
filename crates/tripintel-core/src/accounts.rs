use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_platform() -> String {
    "instagram".to_string()
}

fn default_active() -> bool {
    true
}

/// A tracked public profile, as declared in `config/accounts.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Public handle as it appears in the profile URL, without the `@`.
    pub handle: String,
    pub display_name: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AccountConfig {
    /// Canonical form of the handle: lowercase, leading `@` stripped.
    #[must_use]
    pub fn normalized_handle(&self) -> String {
        self.handle
            .trim()
            .trim_start_matches('@')
            .to_lowercase()
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountsFile {
    pub accounts: Vec<AccountConfig>,
}

/// Load and validate the tracked-accounts configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_accounts(path: &Path) -> Result<AccountsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AccountsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let accounts_file: AccountsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::AccountsFileParse)?;

    validate_accounts(&accounts_file)?;

    Ok(accounts_file)
}

fn validate_accounts(accounts_file: &AccountsFile) -> Result<(), ConfigError> {
    let mut seen_handles = HashSet::new();

    for account in &accounts_file.accounts {
        let handle = account.normalized_handle();

        if handle.is_empty() {
            return Err(ConfigError::Validation(format!(
                "account '{}' has an empty handle",
                account.display_name
            )));
        }

        // Handle charset matches what the upstream platform accepts.
        if !handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "account handle '{}' contains invalid characters",
                account.handle
            )));
        }

        if account.display_name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "account '{handle}' has an empty display name"
            )));
        }

        if !seen_handles.insert(handle.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate account handle: '{handle}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;
