//! Turns stored tokens into an authorized Google Calendar client.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use google_calendar::Client;

use crate::config::{self, AccountTokens, GoogleCredentials};

const REDIRECT_URI: &str = "http://localhost:8085/callback";

pub struct Session {
    account: String,
    creds: GoogleCredentials,
    tokens: AccountTokens,
}

impl Session {
    /// Load credentials and tokens for `account`, refreshing expired tokens.
    pub async fn load_valid(account: &str) -> Result<Self> {
        let mut session = Session {
            account: account.to_string(),
            creds: config::load_credentials()?,
            tokens: config::load_tokens(account)?,
        };

        if session.tokens.needs_refresh(Utc::now()) {
            tracing::info!(account, "access token expired, refreshing");
            session.refresh().await?;
        }

        Ok(session)
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn client(&self) -> Client {
        Client::new(
            self.creds.client_id.clone(),
            self.creds.client_secret.clone(),
            REDIRECT_URI.to_string(),
            self.tokens.access_token.clone(),
            self.tokens.refresh_token.clone(),
        )
    }

    async fn refresh(&mut self) -> Result<()> {
        let access_token = self
            .client()
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        let expires_at = if access_token.expires_in > 0 {
            Some(Utc::now() + Duration::seconds(access_token.expires_in))
        } else {
            None
        };

        // Google typically doesn't return a new refresh_token on refresh
        let refresh_token = if access_token.refresh_token.is_empty() {
            self.tokens.refresh_token.clone()
        } else {
            access_token.refresh_token
        };

        self.tokens = AccountTokens {
            access_token: access_token.access_token,
            refresh_token,
            expires_at,
        };
        config::save_tokens(&self.account, &self.tokens)
    }
}
