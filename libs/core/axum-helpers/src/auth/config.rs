//! Authentication configuration loaded through `core_config::FromEnv`.

use super::credentials::Role;
use core_config::{ConfigError, Environment, FromEnv, env_or_default};
use std::fmt;

/// Accounts available when `AUTH_ACCOUNTS` is unset outside production.
pub const DEVELOPMENT_ACCOUNTS: &str = "admin:adminpass:admin,user:userpass:user";

/// One `username:password:role` entry.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountSpec {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl AccountSpec {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

impl fmt::Debug for AccountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSpec")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Basic-auth configuration.
///
/// - `AUTH_ACCOUNTS`: comma-separated `username:password:role` entries. The
///   password may itself contain `:`. Required when `APP_ENV=production`.
/// - `AUTH_REALM`: realm announced in `WWW-Authenticate` (default `catalog`).
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub realm: String,
    pub accounts: Vec<AccountSpec>,
}

impl AuthConfig {
    pub fn new(realm: impl Into<String>, accounts: Vec<AccountSpec>) -> Self {
        Self {
            realm: realm.into(),
            accounts,
        }
    }
}

impl FromEnv for AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let realm = env_or_default("AUTH_REALM", "catalog");

        let raw = match std::env::var("AUTH_ACCOUNTS") {
            Ok(raw) => raw,
            Err(_) if Environment::from_env().is_production() => {
                return Err(ConfigError::MissingEnvVar("AUTH_ACCOUNTS".to_string()));
            }
            Err(_) => {
                tracing::warn!("AUTH_ACCOUNTS not set, using development accounts");
                DEVELOPMENT_ACCOUNTS.to_string()
            }
        };

        Ok(Self {
            realm,
            accounts: parse_accounts(&raw)?,
        })
    }
}

/// Parses a comma-separated `username:password:role` list.
pub fn parse_accounts(raw: &str) -> Result<Vec<AccountSpec>, ConfigError> {
    let parse_error = |details: String| ConfigError::ParseError {
        key: "AUTH_ACCOUNTS".to_string(),
        details,
    };

    let accounts = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (username, rest) = entry
                .split_once(':')
                .ok_or_else(|| parse_error("expected username:password:role".to_string()))?;
            let (password, role) = rest
                .rsplit_once(':')
                .ok_or_else(|| parse_error(format!("missing role for '{}'", username)))?;

            if username.is_empty() || password.is_empty() {
                return Err(parse_error(
                    "username and password must not be empty".to_string(),
                ));
            }

            let role = role.parse::<Role>().map_err(parse_error)?;
            Ok(AccountSpec::new(username, password, role))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if accounts.is_empty() {
        return Err(parse_error("at least one account is required".to_string()));
    }

    Ok(accounts)
}
