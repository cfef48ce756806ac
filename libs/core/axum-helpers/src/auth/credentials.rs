use super::AuthError;
use super::config::AccountSpec;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Role granted to an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Authenticated caller, inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Checks a username/password pair and yields the granted role.
pub trait CredentialVerifier: Send + Sync + 'static {
    fn verify(&self, username: &str, password: &str) -> Option<Role>;
}

struct StoredAccount {
    password_hash: String,
    role: Role,
}

/// Fixed account list with Argon2-hashed passwords, built once at startup.
///
/// Plain-text passwords are hashed on construction and never retained.
pub struct StaticCredentials {
    accounts: HashMap<String, StoredAccount>,
    hasher: Argon2<'static>,
}

impl StaticCredentials {
    pub fn from_accounts(accounts: &[AccountSpec]) -> Result<Self, AuthError> {
        Self::with_hasher(accounts, Argon2::default())
    }

    /// Builds the verifier with the cheapest Argon2 parameters. Only suitable for tests.
    pub fn insecure_fast(accounts: &[AccountSpec]) -> Result<Self, AuthError> {
        let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
            .map_err(|e| AuthError::Hashing {
                username: String::new(),
                details: e.to_string(),
            })?;
        Self::with_hasher(
            accounts,
            Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        )
    }

    fn with_hasher(accounts: &[AccountSpec], hasher: Argon2<'static>) -> Result<Self, AuthError> {
        let mut stored = HashMap::with_capacity(accounts.len());

        for account in accounts {
            let salt = SaltString::generate(&mut OsRng);
            let password_hash = hasher
                .hash_password(account.password.as_bytes(), &salt)
                .map_err(|e| AuthError::Hashing {
                    username: account.username.clone(),
                    details: e.to_string(),
                })?
                .to_string();

            let previous = stored.insert(
                account.username.clone(),
                StoredAccount {
                    password_hash,
                    role: account.role,
                },
            );
            if previous.is_some() {
                return Err(AuthError::DuplicateAccount(account.username.clone()));
            }
        }

        tracing::info!(accounts = stored.len(), "Credential store initialized");
        Ok(Self {
            accounts: stored,
            hasher,
        })
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Option<Role> {
        let account = self.accounts.get(username)?;
        let parsed = PasswordHash::new(&account.password_hash).ok()?;

        self.hasher
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
            .then_some(account.role)
    }
}
