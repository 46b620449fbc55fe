//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DB_ACQUIRE_TIMEOUT_SECS` (optional): pool acquire timeout, defaults to 5
/// - `CATALOG_PATH` (optional): course catalog file, defaults to catalog.json
/// - `PUBLIC_BASE_URL` (optional): externally reachable base URL, used for
///   the payment return/service URLs
/// - `MERCHANT_ACCOUNT` / `MERCHANT_SECRET` / `MERCHANT_DOMAIN` (optional):
///   payment-provider credentials; payment endpoints are unavailable until
///   all three are set
/// - `PAY_GATEWAY_URL` (optional): provider payment form URL
/// - `CURRENCY` (optional): order currency, defaults to UAH
/// - `MAIL_RELAY_URL` (optional): HTTP relay that delivers login codes;
///   when unset, codes are emitted to the server log instead
/// - `MAIL_FROM` (optional): sender address passed to the relay
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_acquire_timeout")]
    pub db_acquire_timeout_secs: u64,

    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    #[serde(default = "default_base_url")]
    pub public_base_url: String,

    pub merchant_account: Option<String>,
    pub merchant_secret: Option<String>,
    pub merchant_domain: Option<String>,

    #[serde(default = "default_gateway_url")]
    pub pay_gateway_url: String,

    #[serde(default = "default_currency")]
    pub currency: String,

    pub mail_relay_url: Option<String>,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,
}

fn default_port() -> u16 {
    3000
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_catalog_path() -> String {
    "catalog.json".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_gateway_url() -> String {
    "https://secure.wayforpay.com/pay".to_string()
}

fn default_currency() -> String {
    "UAH".to_string()
}

fn default_mail_from() -> String {
    "no-reply@localhost".to_string()
}

/// Payment-provider credentials, present only when fully configured.
#[derive(Debug, Clone)]
pub struct MerchantConfig {
    pub account: String,
    pub secret: String,
    pub domain: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables, deserializes them into a Config
    /// struct, and validates the configured URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    /// - A configured URL is malformed
    pub fn from_env() -> anyhow::Result<Self> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Merchant credentials, or None when payments are not configured.
    ///
    /// All three values must be present. A partial configuration counts as
    /// unconfigured so a half-set environment cannot weaken signature
    /// verification.
    pub fn merchant(&self) -> Option<MerchantConfig> {
        match (
            &self.merchant_account,
            &self.merchant_secret,
            &self.merchant_domain,
        ) {
            (Some(account), Some(secret), Some(domain)) => Some(MerchantConfig {
                account: account.clone(),
                secret: secret.clone(),
                domain: domain.clone(),
            }),
            _ => None,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.public_base_url)
            .map_err(|e| anyhow::anyhow!("PUBLIC_BASE_URL is not a valid URL: {e}"))?;
        url::Url::parse(&self.pay_gateway_url)
            .map_err(|e| anyhow::anyhow!("PAY_GATEWAY_URL is not a valid URL: {e}"))?;
        if let Some(relay) = &self.mail_relay_url {
            url::Url::parse(relay)
                .map_err(|e| anyhow::anyhow!("MAIL_RELAY_URL is not a valid URL: {e}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            server_port: default_port(),
            db_acquire_timeout_secs: default_acquire_timeout(),
            catalog_path: default_catalog_path(),
            public_base_url: default_base_url(),
            merchant_account: None,
            merchant_secret: None,
            merchant_domain: None,
            pay_gateway_url: default_gateway_url(),
            currency: default_currency(),
            mail_relay_url: None,
            mail_from: default_mail_from(),
        }
    }

    #[test]
    fn merchant_requires_all_three_values() {
        let mut config = base_config();
        assert!(config.merchant().is_none());

        config.merchant_account = Some("acct".to_string());
        config.merchant_secret = Some("secret".to_string());
        assert!(config.merchant().is_none(), "partial config must not count");

        config.merchant_domain = Some("example.com".to_string());
        let merchant = config.merchant().unwrap();
        assert_eq!(merchant.account, "acct");
    }

    #[test]
    fn validate_rejects_bad_relay_url() {
        let mut config = base_config();
        config.mail_relay_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }
}
