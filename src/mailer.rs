//! Login-code delivery collaborator.
//!
//! Codes are dispatched as a JSON POST to a configured HTTP mail relay.
//! Delivery is best-effort by contract: a failed or unconfigured relay never
//! fails code issuance — the code stays valid for its TTL and is emitted to
//! the server log so an operator can hand it over manually.

use serde_json::json;

/// HTTP mail-relay client.
///
/// Cloneable; the inner reqwest client shares its connection pool.
#[derive(Debug, Clone)]
pub struct Mailer {
    client: reqwest::Client,
    relay_url: Option<String>,
    from: String,
}

impl Mailer {
    /// Build a mailer from configuration.
    ///
    /// `relay_url = None` means delivery is unconfigured; every send falls
    /// back to the log channel.
    pub fn new(relay_url: Option<String>, from: String) -> Self {
        let client = reqwest::Client::builder()
            // Bounded: a slow relay must not stall code issuance
            .timeout(std::time::Duration::from_secs(5))
            .build()
            // Builder only fails on TLS backend misconfiguration
            .unwrap_or_default();

        Self {
            client,
            relay_url,
            from,
        }
    }

    /// Dispatch a login code to an identity's email address.
    ///
    /// Never returns an error. Failures are logged together with the code so
    /// the operational channel can still complete the login.
    pub async fn send_code(&self, email: &str, code: &str) {
        let Some(relay_url) = &self.relay_url else {
            tracing::warn!("mail relay unconfigured; login code for {email}: {code}");
            return;
        };

        let body = json!({
            "from": self.from,
            "to": email,
            "subject": "Your login code",
            "text": format!("Your login code: {code}. It expires in 5 minutes."),
        });

        match self.client.post(relay_url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("login code sent to {email}");
            }
            Ok(response) => {
                tracing::warn!(
                    "mail relay returned {} for {email}; login code: {code}",
                    response.status()
                );
            }
            Err(e) => {
                tracing::warn!("mail relay request failed for {email}: {e}; login code: {code}");
            }
        }
    }
}
