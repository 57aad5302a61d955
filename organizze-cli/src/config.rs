//! Environment-derived configuration, collected once at startup into an
//! explicit struct so everything below it stays testable.

use anyhow::{Context, Result};
use organizze_api::Credentials;
use std::env;

/// Run-level constants for statement imports: which card the statement
/// belongs to and which category new charges land in.
#[derive(Debug, Clone)]
pub struct ImportDefaults {
    pub category_id: Option<i64>,
    pub credit_card_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    credentials: Option<Credentials>,
    pub import: ImportDefaults,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_opt_id(key: &str) -> Result<Option<i64>> {
    match env_opt(key) {
        Some(raw) => {
            let id = raw
                .trim()
                .parse()
                .with_context(|| format!("{key} must be an integer, got {raw:?}"))?;
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

impl Config {
    /// Read `ORGANIZZE_EMAIL` / `ORGANIZZE_TOKEN` / `ORGANIZZE_NAME` and
    /// the optional `ORGANIZZE_CATEGORY_ID` / `ORGANIZZE_CREDIT_CARD_ID`
    /// defaults. A missing credential triple is not an error here;
    /// only commands that talk to the API need it.
    pub fn from_env() -> Result<Self> {
        let credentials = match (
            env_opt("ORGANIZZE_EMAIL"),
            env_opt("ORGANIZZE_TOKEN"),
            env_opt("ORGANIZZE_NAME"),
        ) {
            (Some(email), Some(token), Some(name)) => Some(Credentials { email, token, name }),
            _ => None,
        };

        Ok(Self {
            credentials,
            import: ImportDefaults {
                category_id: env_opt_id("ORGANIZZE_CATEGORY_ID")?,
                credit_card_id: env_opt_id("ORGANIZZE_CREDIT_CARD_ID")?,
            },
        })
    }

    /// Credentials, or a usage error naming the variables to set.
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials.clone().context(
            "missing API credentials; set ORGANIZZE_EMAIL, ORGANIZZE_TOKEN and ORGANIZZE_NAME",
        )
    }
}
