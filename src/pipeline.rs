use anyhow::Result;
use tracing::{info, warn};

use crate::{
    config::{Config, LampMode},
    discord::{embed::build_embed, DiscordNotifier},
    lamp::{Brightness, LampSetting},
    switchbot::SwitchBotClient,
    weather::WeatherClient,
};

/// One forecast → lamp → notification pass.
pub struct RainLamp {
    weather: WeatherClient,
    switchbot: SwitchBotClient,
    discord: DiscordNotifier,
    city_code: String,
    device_id: String,
    mode: LampMode,
    brightness: Brightness,
}

impl RainLamp {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            weather: WeatherClient::new(config)?,
            switchbot: SwitchBotClient::new(config)?,
            discord: DiscordNotifier::new(&config.discord)?,
            city_code: config.city_code.clone(),
            device_id: config.device_id.clone(),
            mode: config.lamp_mode,
            brightness: config.brightness,
        })
    }

    /// Runs the pipeline once.
    ///
    /// Always returns `true`: a missing forecast degrades to the dry colour,
    /// and device or webhook failures are only logged.
    pub async fn run(&self) -> bool {
        let (rain_level, forecast) = self.weather.fetch_rain_level(&self.city_code).await;
        info!(rain_level, "Rain chance used");

        let setting = LampSetting::from_rain_level(rain_level, self.mode, self.brightness);
        info!(
            device_id = %self.device_id,
            color = %setting.color,
            brightness = %setting.brightness,
            "Applying lamp setting"
        );

        let report = self.switchbot.apply(&self.device_id, &setting).await;
        if !report.all_succeeded() {
            warn!(
                device_id = %self.device_id,
                failed = ?report.failed(),
                "Some lamp commands failed"
            );
        }

        let embed = build_embed(forecast.as_ref(), &setting);
        self.discord.notify(embed.as_ref()).await;

        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use super::*;
    use crate::{config::DiscordConfig, test_support};

    fn rainy_forecast() -> Value {
        json!({
            "forecasts": [ {
                "telop": "曇のち雨",
                "chanceOfRain": {
                    "T00_06": "10%", "T06_12": "20%", "T12_18": "70%", "T18_24": "5%"
                },
                "temperature": { "min": { "celsius": "9" }, "max": { "celsius": "15" } },
                "publishingOffice": "気象庁"
            } ],
            "location": { "prefecture": "東京都", "district": "東京地方", "city": "東京" }
        })
    }

    fn config(weather: &str, switchbot: &str, webhook: Option<String>, mode: LampMode) -> Config {
        Config {
            switchbot_token: "token".to_owned(),
            switchbot_secret: "secret".to_owned(),
            switchbot_base_url: switchbot.to_owned(),
            device_id: "lamp-1".to_owned(),
            city_code: "130010".to_owned(),
            weather_base_url: weather.to_owned(),
            lamp_mode: mode,
            brightness: Brightness::MAX,
            http_timeout: Duration::from_secs(5),
            discord: DiscordConfig {
                enabled: true,
                webhook_url: webhook,
                timeout: Duration::from_secs(5),
            },
        }
    }

    fn sent_commands(log: &test_support::RequestLog) -> Vec<(String, String)> {
        log.take()
            .iter()
            .map(|r| {
                (
                    r.body["command"].as_str().unwrap().to_owned(),
                    r.body["parameter"].as_str().unwrap().to_owned(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn rgb_run_sets_lamp_and_notifies() {
        let weather = test_support::forecast_server(rainy_forecast()).await;
        let (switchbot, commands) = test_support::switchbot_ok().await;
        let (discord, webhook) =
            test_support::recording_server(StatusCode::OK, json!({})).await;

        let lamp = RainLamp::new(&config(
            &weather,
            &switchbot,
            Some(format!("{discord}/hook")),
            LampMode::Rgb,
        ))
        .unwrap();

        assert!(lamp.run().await);
        assert_eq!(
            sent_commands(&commands),
            vec![
                ("setBrightness".to_owned(), "100".to_owned()),
                ("setColor".to_owned(), "0:127:255".to_owned()),
                ("turnOn".to_owned(), "default".to_owned()),
            ]
        );

        let posted = webhook.take();
        assert_eq!(posted.len(), 1);
        let embed = &posted[0].body["embeds"][0];
        assert_eq!(embed["color"], 32767);
        assert_eq!(embed["fields"][0]["value"], "70%");
        assert_eq!(embed["description"], "曇のち雨 - 東京地方");
    }

    #[tokio::test]
    async fn color_temperature_run_sets_kelvin() {
        let weather = test_support::forecast_server(rainy_forecast()).await;
        let (switchbot, commands) = test_support::switchbot_ok().await;

        let lamp = RainLamp::new(&config(&weather, &switchbot, None, LampMode::ColorTemperature))
            .unwrap();

        assert!(lamp.run().await);
        assert_eq!(
            sent_commands(&commands)[1],
            ("setColorTemperature".to_owned(), "5260".to_owned())
        );
    }

    #[tokio::test]
    async fn forecast_failure_still_sets_dry_color_and_skips_webhook() {
        let (switchbot, commands) = test_support::switchbot_ok().await;
        let (discord, webhook) =
            test_support::recording_server(StatusCode::OK, json!({})).await;

        let lamp = RainLamp::new(&config(
            "http://127.0.0.1:9",
            &switchbot,
            Some(format!("{discord}/hook")),
            LampMode::Rgb,
        ))
        .unwrap();

        assert!(lamp.run().await);
        assert_eq!(
            sent_commands(&commands)[1],
            ("setColor".to_owned(), "255:127:0".to_owned())
        );
        assert!(webhook.take().is_empty());
    }

    #[tokio::test]
    async fn device_failures_do_not_fail_the_run() {
        let weather = test_support::forecast_server(rainy_forecast()).await;
        let (switchbot, commands) = test_support::recording_server(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "statusCode": 190 }),
        )
        .await;

        let lamp = RainLamp::new(&config(&weather, &switchbot, None, LampMode::Rgb)).unwrap();

        assert!(lamp.run().await);
        assert_eq!(commands.take().len(), 3);
    }
}
