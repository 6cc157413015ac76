//! Credential and token storage for the Google gateway.
//!
//! Credentials and tokens are stored in:
//!   ~/.config/holisync/providers/google/credentials.json
//!   ~/.config/holisync/providers/google/tokens/{account}.json

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Refresh this long before the stored expiry to avoid racing it.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth client credentials (user-provided).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Tokens for a single authenticated account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccountTokens {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) <= now,
            None => false,
        }
    }
}

fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("holisync")
        .join("providers")
        .join("google"))
}

fn tokens_dir() -> Result<PathBuf> {
    Ok(base_dir()?.join("tokens"))
}

fn token_path(account: &str) -> Result<PathBuf> {
    let safe_account = account.replace(['/', '\\', ':'], "_");
    Ok(tokens_dir()?.join(format!("{}.json", safe_account)))
}

pub fn load_credentials() -> Result<GoogleCredentials> {
    let path = base_dir()?.join("credentials.json");

    if !path.exists() {
        anyhow::bail!(
            "Google credentials not found.\n\n\
            Create {} with:\n\n\
            {{\n  \
              \"client_id\": \"your-client-id.apps.googleusercontent.com\",\n  \
              \"client_secret\": \"your-client-secret\"\n\
            }}\n\n\
            See https://console.cloud.google.com/apis/credentials for setup.",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse credentials from {}", path.display()))
}

pub fn load_tokens(account: &str) -> Result<AccountTokens> {
    let path = token_path(account)?;

    if !path.exists() {
        anyhow::bail!("No stored tokens for account {} (expected {})", account, path.display());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read tokens from {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse tokens from {}", path.display()))
}

pub fn save_tokens(account: &str, tokens: &AccountTokens) -> Result<()> {
    let path = token_path(account)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create tokens directory at {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(tokens).context("Failed to serialize tokens")?;

    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write tokens to {}", path.display()))?;

    Ok(())
}

/// Accounts that have a token file, sorted.
pub fn stored_accounts() -> Result<Vec<String>> {
    let dir = tokens_dir()?;

    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Ok(Vec::new());
    };

    let mut accounts: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
        .collect();

    accounts.sort();
    Ok(accounts)
}

/// The configured account, or the only stored one if none is configured.
pub fn resolve_account(configured: Option<&str>) -> Result<String> {
    if let Some(account) = configured {
        return Ok(account.to_string());
    }

    let mut accounts = stored_accounts()?;
    match accounts.len() {
        1 => Ok(accounts.remove(0)),
        0 => anyhow::bail!(
            "No Google account tokens found in {}",
            tokens_dir()?.display()
        ),
        _ => anyhow::bail!(
            "Several Google accounts have tokens ({}); set google_account in the config",
            accounts.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tokens(expires_at: Option<DateTime<Utc>>) -> AccountTokens {
        AccountTokens {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at,
        }
    }

    #[test]
    fn test_needs_refresh() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();

        assert!(tokens(Some(now - Duration::minutes(5))).needs_refresh(now));
        assert!(tokens(Some(now + Duration::seconds(30))).needs_refresh(now));
        assert!(!tokens(Some(now + Duration::hours(1))).needs_refresh(now));
        assert!(!tokens(None).needs_refresh(now));
    }

    #[test]
    fn test_tokens_json_without_expiry() {
        let parsed: AccountTokens =
            serde_json::from_str(r#"{"access_token":"x","refresh_token":"y"}"#).unwrap();
        assert_eq!(parsed.expires_at, None);
    }

    #[test]
    fn test_configured_account_wins() {
        assert_eq!(resolve_account(Some("me@example.com")).unwrap(), "me@example.com");
    }
}
