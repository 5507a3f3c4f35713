use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};

use crate::lamp::Brightness;

pub const DEFAULT_SWITCHBOT_BASE_URL: &str = "https://api.switch-bot.com";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://weather.tsukumijima.net/api/forecast/city";

// ---------------------------------------------------------------------------
// LampMode
// ---------------------------------------------------------------------------

/// How the rain level is rendered on the lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LampMode {
    /// Six-bucket RGB palette.
    #[default]
    Rgb,
    /// Linear 2700 K – 6500 K white.
    ColorTemperature,
}

impl LampMode {
    fn from_flag(use_color_temperature: bool) -> Self {
        if use_color_temperature {
            Self::ColorTemperature
        } else {
            Self::Rgb
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub switchbot_token: String,
    pub switchbot_secret: String,
    pub switchbot_base_url: String,
    /// The single lamp this process drives.
    pub device_id: String,
    /// Tsukumijima city code, e.g. `130010` for Tokyo.
    pub city_code: String,
    pub weather_base_url: String,
    pub lamp_mode: LampMode,
    pub brightness: Brightness,
    /// Timeout for the forecast and device API calls.
    pub http_timeout: Duration,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub enabled: bool,
    /// `None` when `DISCORD_WEBHOOK_URL` is unset or empty.
    pub webhook_url: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key).with_context(|| format!("missing required env var: {key}"))
        };
        let optional =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let webhook_url = optional("DISCORD_WEBHOOK_URL", "");

        Ok(Self {
            switchbot_token: required("SWITCHBOT_ACCESS_TOKEN")?,
            switchbot_secret: required("SWITCHBOT_SECRET")?,
            switchbot_base_url: optional("SWITCHBOT_BASE_URL", DEFAULT_SWITCHBOT_BASE_URL),
            device_id: required("SWITCHBOT_FLOOR_LAMP_DEVICE_ID")?,
            city_code: required("WEATHER_CITY_CODE")?,
            weather_base_url: optional("WEATHER_BASE_URL", DEFAULT_WEATHER_BASE_URL),
            lamp_mode: LampMode::from_flag(parse_flag(&optional("USE_COLOR_TEMPERATURE", "0"))),
            brightness: Brightness::parse(&optional("LAMP_BRIGHTNESS", "100")),
            http_timeout: parse_secs(&optional("HTTP_TIMEOUT_SECS", "10"))
                .context("HTTP_TIMEOUT_SECS must be a positive integer")?,
            discord: DiscordConfig {
                enabled: parse_flag(&optional("DISCORD_ENABLED", "1")),
                webhook_url: (!webhook_url.trim().is_empty()).then_some(webhook_url),
                timeout: parse_secs(&optional("DISCORD_TIMEOUT", "10"))
                    .context("DISCORD_TIMEOUT must be a positive integer")?,
            },
        })
    }
}

/// `1`, `true`, `t`, `yes` and `y` (any case) are truthy; everything else is not.
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y"
    )
}

fn parse_secs(raw: &str) -> Result<Duration> {
    let secs = u64::from_str(raw.trim())?;
    anyhow::ensure!(secs > 0, "timeout must be at least 1 second");
    Ok(Duration::from_secs(secs))
}
