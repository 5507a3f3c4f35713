pub mod models;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, error, info};

use crate::config::Config;

use self::models::Forecast;

/// Client for the Tsukumijima forecast API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.weather_base_url, config.http_timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build weather HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Today's maximum chance of rain over the 06–24 slots, plus the payload
    /// for display.
    ///
    /// Any failure is logged and reported as `(0, None)` so the lamp still
    /// gets a "dry" setting.
    pub async fn fetch_rain_level(&self, city_code: &str) -> (u32, Option<Forecast>) {
        let forecast = match self.fetch_forecast(city_code).await {
            Ok(forecast) => forecast,
            Err(e) => {
                error!(city_code = %city_code, error = %format!("{e:#}"), "Weather API error");
                return (0, None);
            }
        };

        let level = match forecast.today() {
            Some(today) => {
                let slots = today.chance_of_rain.daylight_slots().map(|(label, raw)| {
                    (label, sanitize_percent(raw.unwrap_or_default()))
                });
                let level = slots.iter().map(|(_, v)| *v).max().unwrap_or(0);
                info!(slots = ?slots, level, "Daylight chance of rain");
                level
            }
            None => 0,
        };

        (level, Some(forecast))
    }

    async fn fetch_forecast(&self, city_code: &str) -> Result<Forecast> {
        let url = format!("{}/{}", self.base_url, city_code);
        debug!(url = %url, "Requesting forecast");

        let forecast = self
            .http
            .get(&url)
            .send()
            .await
            .context("Forecast request failed")?
            .error_for_status()
            .context("Forecast endpoint returned error status")?
            .json::<Forecast>()
            .await
            .context("Failed to deserialize forecast response")?;

        anyhow::ensure!(forecast.today().is_some(), "Forecast response has no entry for today");
        Ok(forecast)
    }
}

/// Keeps only the decimal digits of `raw` and parses them; empty means 0.
/// Full-width digits count the same as ASCII ones.
///
/// `"40%"` → 40, `"４０％"` → 40, `"--%"` → 0, `""` → 0.
pub fn sanitize_percent(raw: &str) -> u32 {
    let digits: String = raw.chars().filter_map(decimal_digit).collect();
    digits.parse().unwrap_or(0)
}

fn decimal_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '０'..='９' => char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')),
        _ => None,
    }
}
