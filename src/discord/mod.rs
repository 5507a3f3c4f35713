pub mod embed;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use crate::config::DiscordConfig;

use self::embed::{Embed, WebhookPayload};

/// Best-effort Discord webhook sender. Never fails the run.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    http: Client,
    enabled: bool,
    webhook_url: Option<String>,
}

impl DiscordNotifier {
    pub fn new(config: &DiscordConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build Discord HTTP client")?;
        Ok(Self {
            http,
            enabled: config.enabled,
            webhook_url: config.webhook_url.clone(),
        })
    }

    /// Posts `embed` to the webhook.
    ///
    /// Returns `true` when sent, or when notifications are disabled (nothing to
    /// do). Returns `false` when the webhook is unconfigured, there is no
    /// embed, or the request fails.
    pub async fn notify(&self, embed: Option<&Embed>) -> bool {
        if !self.enabled {
            info!("Discord notification is disabled");
            return true;
        }

        let Some(url) = self.webhook_url.as_deref() else {
            warn!("DISCORD_WEBHOOK_URL is not set");
            return false;
        };

        let Some(embed) = embed else {
            warn!("No forecast to report; skipping Discord notification");
            return false;
        };

        let payload = WebhookPayload { embeds: [embed] };
        let result = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .and_then(|resp| resp.error_for_status());

        match result {
            Ok(_) => {
                info!("Discord notification sent");
                true
            }
            Err(e) => {
                warn!(error = %e, "Discord notification failed");
                false
            }
        }
    }
}
