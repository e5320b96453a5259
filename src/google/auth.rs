//! Service-account authentication.
//!
//! The keyfile is a Google service-account JSON key. A fresh token is
//! requested for every tick, so there's nothing to persist or refresh.

use std::path::Path;

use anyhow::{Context, Result};
use yup_oauth2::{ServiceAccountAuthenticator, read_service_account_key};

/// Read/write access to calendars and events.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Exchange the service-account key at `keyfile` for an access token.
pub async fn access_token(keyfile: &Path) -> Result<String> {
    let key = read_service_account_key(keyfile)
        .await
        .with_context(|| format!("Failed to read service account key at {}", keyfile.display()))?;

    let auth = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .context("Failed to build service account authenticator")?;

    let token = auth
        .token(&[CALENDAR_SCOPE])
        .await
        .context("Failed to obtain Google access token")?;

    token
        .token()
        .map(str::to_string)
        .context("Google returned an empty access token")
}
