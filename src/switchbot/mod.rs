pub mod models;

use std::time::Duration;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    config::Config,
    lamp::{Brightness, LampColor, LampSetting, Rgb, MAX_KELVIN, MIN_KELVIN},
};

use self::models::{CommandResponse, DeviceCommand};

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single device command did not go through.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid request headers: {0}")]
    Headers(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("undecodable response body: {0}")]
    Decode(reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("SwitchBot statusCode={status_code}, message={message}")]
    Api { status_code: i64, message: String },
}

// ---------------------------------------------------------------------------
// CommandReport
// ---------------------------------------------------------------------------

/// Per-command outcome of one lamp update, in the order the commands were sent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub outcomes: Vec<(String, bool)>,
}

impl CommandReport {
    fn record(&mut self, command: &DeviceCommand, ok: bool) {
        self.outcomes.push((command.command.clone(), ok));
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|(_, ok)| *ok)
    }

    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// SwitchBot Cloud API v1.1 client bound to one account.
#[derive(Debug, Clone)]
pub struct SwitchBotClient {
    http: Client,
    base_url: String,
    token: String,
    secret: String,
}

impl SwitchBotClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(
            &config.switchbot_base_url,
            &config.switchbot_token,
            &config.switchbot_secret,
            config.http_timeout,
        )
    }

    pub fn with_base_url(
        base_url: &str,
        token: &str,
        secret: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build SwitchBot HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            secret: secret.to_owned(),
        })
    }

    /// Sends one command to `device_id`. Every failure mode is logged and
    /// returned; nothing is retried.
    pub async fn post_command(
        &self,
        device_id: &str,
        command: &DeviceCommand,
    ) -> Result<CommandResponse, CommandError> {
        let url = format!("{}/v1.1/devices/{}/commands", self.base_url, device_id);
        info!(
            device_id = %device_id,
            command = %command.command,
            parameter = %command.parameter,
            "Sending SwitchBot command"
        );

        let result = self.send(&url, command).await;
        match &result {
            Ok(resp) => info!(
                device_id = %device_id,
                command = %command.command,
                status_code = resp.status_code,
                "SwitchBot command accepted"
            ),
            Err(e) => error!(
                device_id = %device_id,
                command = %command.command,
                error = %e,
                "SwitchBot command failed"
            ),
        }
        result
    }

    async fn send(
        &self,
        url: &str,
        command: &DeviceCommand,
    ) -> Result<CommandResponse, CommandError> {
        let signed = sign(&self.token, &self.secret, None);
        let headers = signed
            .headers(&self.token)
            .map_err(|e| CommandError::Headers(format!("{e:#}")))?;

        let resp = self
            .http
            .post(url)
            .headers(headers)
            .json(command)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CommandError::Status(status));
        }

        let payload = resp
            .json::<CommandResponse>()
            .await
            .map_err(CommandError::Decode)?;
        debug!(payload = ?payload, "SwitchBot response");

        if !payload.is_success() {
            return Err(CommandError::Api {
                status_code: payload.status_code,
                message: payload.message.unwrap_or_else(|| "(no message)".to_owned()),
            });
        }
        Ok(payload)
    }

    /// Brightness, then colour, then power-on, so the lamp lights up already
    /// showing the target colour. A failed step does not stop the next one.
    pub async fn set_lamp_rgb(
        &self,
        device_id: &str,
        rgb: Rgb,
        brightness: Brightness,
    ) -> CommandReport {
        self.run_sequence(
            device_id,
            [
                DeviceCommand::set_brightness(brightness),
                DeviceCommand::set_color(rgb),
                DeviceCommand::turn_on(),
            ],
        )
        .await
    }

    /// Same ordering as [`Self::set_lamp_rgb`]; `kelvin` is clamped to the
    /// lamp's 2700–6500 K range.
    pub async fn set_lamp_color_temperature(
        &self,
        device_id: &str,
        kelvin: u32,
        brightness: Brightness,
    ) -> CommandReport {
        let kelvin = kelvin.clamp(MIN_KELVIN, MAX_KELVIN);
        self.run_sequence(
            device_id,
            [
                DeviceCommand::set_brightness(brightness),
                DeviceCommand::set_color_temperature(kelvin),
                DeviceCommand::turn_on(),
            ],
        )
        .await
    }

    pub async fn apply(&self, device_id: &str, setting: &LampSetting) -> CommandReport {
        match setting.color {
            LampColor::Rgb(rgb) => self.set_lamp_rgb(device_id, rgb, setting.brightness).await,
            LampColor::Temperature(kelvin) => {
                self.set_lamp_color_temperature(device_id, kelvin, setting.brightness).await
            }
        }
    }

    async fn run_sequence(
        &self,
        device_id: &str,
        commands: [DeviceCommand; 3],
    ) -> CommandReport {
        let mut report = CommandReport::default();
        for command in &commands {
            let ok = self.post_command(device_id, command).await.is_ok();
            report.record(command, ok);
        }
        report
    }
}

// ---------------------------------------------------------------------------
// Signing helpers
// ---------------------------------------------------------------------------

/// The `t` / `nonce` / `sign` triple for one request. Never reuse one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// 13-digit Unix timestamp in milliseconds.
    pub t: String,
    pub nonce: String,
    /// Base64 HMAC-SHA256.
    pub sign: String,
}

impl SignedRequest {
    /// Headers required by the v1.1 API, including `Authorization`.
    pub fn headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value("Authorization", token)?);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf8"),
        );
        headers.insert(HeaderName::from_static("t"), header_value("t", &self.t)?);
        headers.insert(HeaderName::from_static("sign"), header_value("sign", &self.sign)?);
        headers.insert(HeaderName::from_static("nonce"), header_value("nonce", &self.nonce)?);
        Ok(headers)
    }
}

/// Signs a request with the current time and, unless one is supplied, a fresh
/// UUID v4 nonce.
///
/// SwitchBot signing specification:
/// <https://github.com/OpenWonderLabs/SwitchBotAPI#authentication>
pub fn sign(token: &str, secret: &str, nonce: Option<&str>) -> SignedRequest {
    let t = chrono::Utc::now().timestamp_millis().to_string();
    let nonce = nonce.map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);
    sign_with(token, secret, &t, &nonce)
}

/// Deterministic core of [`sign`]: `base64(HMAC-SHA256(secret, token + t + nonce))`.
pub(crate) fn sign_with(token: &str, secret: &str, t: &str, nonce: &str) -> SignedRequest {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    mac.update(t.as_bytes());
    mac.update(nonce.as_bytes());
    let sign = BASE64.encode(mac.finalize().into_bytes());

    SignedRequest {
        t: t.to_owned(),
        nonce: nonce.to_owned(),
        sign,
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).with_context(|| format!("invalid header value for {name}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
