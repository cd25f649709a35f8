use serde::{Deserialize, Serialize};

use crate::{PageLimits, SymmetricKey, TokenCodec};

/// Environment variable naming an alternative TOML file.
pub const CONFIG_PATH_ENV: &str = "TOKENSEAL_CONFIG_PATH";

/// TOML file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/tokenseal.toml";

/// Top-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Token sealing settings.
    pub token: TokenSettings,
    /// Page size bounds for list endpoints.
    pub pagination: PageLimits,
}

/// Token sealing settings.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Symmetric key, standard base64. Must decode to 16, 24 or 32 bytes.
    pub key: String,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("key", &if self.key.is_empty() { "<unset>" } else { "<redacted>" })
            .finish()
    }
}

impl Config {
    /// Loads configuration from `.env`, a TOML file, and environment variables.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables with `TOKENSEAL_` prefix, `__` between levels
    ///    (e.g., `TOKENSEAL_TOKEN__KEY`)
    /// 2. TOML configuration file (if exists)
    /// 3. `.env` file (if exists)
    /// 4. Built-in defaults
    ///
    /// The TOML file path can be set via `TOKENSEAL_CONFIG_PATH`. If not set,
    /// defaults to `./config/tokenseal.toml`. A missing file is skipped.
    ///
    /// # Environment Variable Examples
    /// ```bash
    /// TOKENSEAL_TOKEN__KEY=q5v3cR2m9Yl7c8n1a0b2d4e6f8h0j2k4m6p8r0t2v4w=
    /// TOKENSEAL_PAGINATION__DEFAULT_PAGE_SIZE=25
    /// TOKENSEAL_PAGINATION__MAX_PAGE_SIZE=500
    /// ```
    ///
    /// # Errors
    /// Returns an error if a source is malformed or a value has the wrong type.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> figment::error::Result<Self> {
        use figment::Figment;
        use figment::providers::{Env, Format, Serialized, Toml};

        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();

        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("TOKENSEAL_").split("__"))
            .extract()
    }

    /// Validates the configuration for use.
    ///
    /// # Errors
    /// Returns an error message if the key is missing or invalid, or the page
    /// limits are inconsistent.
    pub fn validate(&self) -> Result<(), String> {
        if self.token.key.trim().is_empty() {
            return Err("token.key is not set".to_string());
        }

        SymmetricKey::from_base64(&self.token.key).map_err(|e| format!("token.key: {e}"))?;

        if self.pagination.max_page_size == 0 {
            return Err("pagination.max_page_size cannot be zero".to_string());
        }

        if self.pagination.default_page_size == 0 {
            return Err("pagination.default_page_size cannot be zero".to_string());
        }

        if self.pagination.default_page_size > self.pagination.max_page_size {
            return Err(format!(
                "pagination.default_page_size ({}) exceeds max_page_size ({})",
                self.pagination.default_page_size, self.pagination.max_page_size
            ));
        }

        Ok(())
    }

    /// Builds the token codec from the configured key.
    ///
    /// # Errors
    /// Returns [`crate::Error::Base64`] or [`crate::Error::KeyLength`] for a bad key.
    pub fn token_codec(&self) -> crate::Result<TokenCodec> {
        Ok(TokenCodec::new(SymmetricKey::from_base64(&self.token.key)?))
    }
}
