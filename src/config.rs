//! Configuration types, built once at startup from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_DB_PATH: &str = "./data/galaxies.db";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 900;
pub const DEFAULT_MAIL_SERVER: &str = "smtp.mailtrap.io";
pub const DEFAULT_MAIL_PORT: u16 = 25;
pub const DEFAULT_MAIL_SENDER: &str = "admin@api.com";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,
    /// Location of the libSQL database file.
    pub database_path: PathBuf,
    pub token: TokenConfig,
    pub mail: MailConfig,
}

/// Bearer token settings.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC signing secret.
    pub secret: SecretString,
    /// Lifetime of an access token.
    pub ttl: Duration,
}

/// SMTP settings for outbound mail.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Upgrade the connection with STARTTLS.
    pub use_tls: bool,
    /// `From` address on every message.
    pub default_sender: String,
}

impl AppConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind: SocketAddr = parse_or(&lookup, "GALAXY_API_BIND", DEFAULT_BIND.parse().ok())?;
        let database_path = database_path_from(&lookup);

        let secret = required(&lookup, "JWT_SECRET_KEY")?;
        let ttl_secs: u64 = parse_or(
            &lookup,
            "JWT_ACCESS_TOKEN_EXPIRES_SECS",
            Some(DEFAULT_TOKEN_TTL_SECS),
        )?;

        let mail = MailConfig {
            server: lookup("MAIL_SERVER").unwrap_or_else(|| DEFAULT_MAIL_SERVER.to_string()),
            port: parse_or(&lookup, "MAIL_PORT", Some(DEFAULT_MAIL_PORT))?,
            username: required(&lookup, "MAIL_USERNAME")?,
            password: SecretString::from(required(&lookup, "MAIL_PASSWORD")?),
            use_tls: parse_bool(&lookup, "MAIL_USE_TLS")?,
            default_sender: lookup("MAIL_DEFAULT_SENDER")
                .unwrap_or_else(|| DEFAULT_MAIL_SENDER.to_string()),
        };

        Ok(Self {
            bind,
            database_path,
            token: TokenConfig {
                secret: SecretString::from(secret),
                ttl: Duration::from_secs(ttl_secs),
            },
            mail,
        })
    }
}

/// Database location from `GALAXY_API_DB_PATH`, falling back to the default.
pub fn database_path_from<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("GALAXY_API_DB_PATH")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => default.ok_or_else(|| ConfigError::MissingEnvVar(key.to_string())),
    }
}

fn parse_bool<F>(lookup: &F, key: &str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("yes") => {
            Ok(true)
        }
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" || v.eq_ignore_ascii_case("no") => {
            Ok(false)
        }
        Some(v) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {v:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("JWT_SECRET_KEY", "s3cret"),
        ("MAIL_USERNAME", "mailer"),
        ("MAIL_PASSWORD", "hunter2"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let config = AppConfig::from_lookup(lookup_from(MINIMAL)).unwrap();
        assert_eq!(config.bind, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.token.ttl, Duration::from_secs(900));
        assert_eq!(config.token.secret.expose_secret(), "s3cret");
        assert_eq!(config.mail.server, "smtp.mailtrap.io");
        assert_eq!(config.mail.port, 25);
        assert!(!config.mail.use_tls);
        assert_eq!(config.mail.default_sender, "admin@api.com");
        assert_eq!(config.mail.password.expose_secret(), "hunter2");
    }

    #[test]
    fn missing_signing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("MAIL_USERNAME", "mailer"),
            ("MAIL_PASSWORD", "hunter2"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "JWT_SECRET_KEY"));
    }

    #[test]
    fn missing_mail_credentials_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET_KEY", "s")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "MAIL_USERNAME"));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut pairs = MINIMAL.to_vec();
        pairs.extend_from_slice(&[
            ("GALAXY_API_BIND", "127.0.0.1:8081"),
            ("GALAXY_API_DB_PATH", "/tmp/g.db"),
            ("JWT_ACCESS_TOKEN_EXPIRES_SECS", "60"),
            ("MAIL_PORT", "2525"),
            ("MAIL_USE_TLS", "true"),
            ("MAIL_DEFAULT_SENDER", "ops@example.com"),
        ]);
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.bind.port(), 8081);
        assert_eq!(config.database_path, PathBuf::from("/tmp/g.db"));
        assert_eq!(config.token.ttl, Duration::from_secs(60));
        assert_eq!(config.mail.port, 2525);
        assert!(config.mail.use_tls);
        assert_eq!(config.mail.default_sender, "ops@example.com");
    }

    #[test]
    fn invalid_port_is_reported_with_key() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("MAIL_PORT", "smtp"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "MAIL_PORT"));
    }

    #[test]
    fn invalid_bool_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("MAIL_USE_TLS", "maybe"));
        assert!(AppConfig::from_lookup(lookup_from(&pairs)).is_err());
    }
}
