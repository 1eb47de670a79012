//! Server configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_request_size: usize,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT token expiration time in hours
    pub jwt_expiration_hours: u64,

    /// Allow user registration
    pub allow_signup: bool,

    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,

    /// Core library configuration file (TOML, YAML or JSON)
    pub config_file_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            max_request_size: 1024 * 1024, // 1MB
            jwt_secret: "".to_string(),    // Generated at runtime if not provided
            jwt_expiration_hours: 24,
            allow_signup: true,
            cors_origin: None,
            config_file_path: None,
        }
    }
}

/// Generate a random 64 character alphanumeric secret
pub fn generate_secret() -> String {
    use rand::Rng;
    use rand::distr::Alphanumeric;
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

impl ServerConfig {
    /// Load configuration from CLI arguments and environment variables
    /// CLI arguments take precedence over environment variables
    pub fn from_cli_and_env(cli_args: crate::cli::CliArgs) -> Result<Self> {
        Self::from_sources(cli_args, |key| env::var(key).ok())
    }

    /// Same as [`Self::from_cli_and_env`] with an injectable environment lookup
    pub fn from_sources(
        cli_args: crate::cli::CliArgs,
        env_var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = cli_args.port {
            config.port = port;
        } else if let Some(port) = env_var("GOALPOST_PORT") {
            config.port = port.parse()?;
        }

        if let Some(max_size) = cli_args.max_request_size {
            config.max_request_size = max_size;
        } else if let Some(max_size) = env_var("GOALPOST_MAX_REQUEST_SIZE") {
            config.max_request_size = max_size.parse()?;
        }

        if let Some(jwt_secret) = cli_args.jwt_secret.or_else(|| env_var("GOALPOST_JWT_SECRET")) {
            config.jwt_secret = jwt_secret;
        }
        if config.jwt_secret.is_empty() {
            tracing::warn!("No JWT secret configured; generated a random one, tokens will not survive a restart");
            config.jwt_secret = generate_secret();
        }

        if let Some(exp_hours) = cli_args.jwt_expiration_hours {
            config.jwt_expiration_hours = exp_hours;
        } else if let Some(exp_hours) = env_var("GOALPOST_JWT_EXPIRATION_HOURS") {
            config.jwt_expiration_hours = exp_hours.parse()?;
        }

        if let Some(allow_signup) = cli_args.allow_signup {
            config.allow_signup = allow_signup;
        } else if let Some(allow_signup) = env_var("GOALPOST_ALLOW_SIGNUP") {
            config.allow_signup = allow_signup.parse().unwrap_or(true);
        }

        config.cors_origin = cli_args
            .cors_origin
            .or_else(|| env_var("GOALPOST_CORS_ORIGIN"))
            .filter(|origin| !origin.trim().is_empty());

        config.config_file_path = cli_args
            .config_file
            .or_else(|| env_var("GOALPOST_CONFIG_FILE").map(PathBuf::from));

        Ok(config)
    }
}
