use serde::Serialize;

use crate::{
    lamp::LampSetting,
    weather::models::{Coordinate, Forecast, TemperatureRange, TemperatureReading},
};

// ---------------------------------------------------------------------------
// Wire types: https://discord.com/developers/docs/resources/message#embed-object
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub description: String,
    /// `0xRRGGBB` as a plain integer.
    pub color: u32,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn inline(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_owned(),
            value: value.into(),
            inline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub embeds: [&'a Embed; 1],
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Summary of today's forecast and the lamp setting chosen from it.
///
/// Returns `None` when there is no forecast, so a failed fetch never turns
/// into a misleading "0 % rain" message.
pub fn build_embed(forecast: Option<&Forecast>, setting: &LampSetting) -> Option<Embed> {
    let forecast = forecast?;
    let today = forecast.today()?;
    let location = &forecast.location;

    let prefecture = location.prefecture.as_deref().unwrap_or_default();
    let city = location.city.as_deref().unwrap_or_default();
    let area = non_empty(location.district.as_deref()).or(non_empty(Some(city)));

    let url = match non_empty(today.link_url.as_deref()) {
        Some(link) => link.to_owned(),
        None => {
            let coord =
                |c: &Option<Coordinate>| c.as_ref().map(ToString::to_string).unwrap_or_default();
            format!(
                "https://www.jma.go.jp/bosai/map.html#contents=forecast_map&lat={}&lon={}&zoom=8",
                coord(&location.lat),
                coord(&location.lon),
            )
        }
    };

    let telop = today.telop.as_deref().unwrap_or_default();
    let description = match area {
        Some(area) => format!("{telop} - {area}"),
        None => telop.to_owned(),
    };

    let mut fields = vec![EmbedField::inline(
        "Precipitation (Max)",
        format!("{}%", setting.rain_level),
    )];
    fields.extend(
        today
            .chance_of_rain
            .daylight_slots()
            .into_iter()
            .map(|(label, raw)| EmbedField::inline(label, non_empty(raw).unwrap_or("--%"))),
    );
    fields.push(EmbedField::inline(
        "Temperature",
        format_temperature_range(today.temperature.as_ref()),
    ));
    fields.push(EmbedField::inline("Lamp Setting", setting.color.to_string()));

    if let Some(detail) = today.detail.as_ref().and_then(|d| non_empty(d.weather.as_deref())) {
        fields.push(EmbedField {
            name: "Details".to_owned(),
            value: detail.to_owned(),
            inline: false,
        });
    }

    let thumbnail = today
        .image
        .as_ref()
        .and_then(|img| non_empty(img.url.as_deref()))
        .map(|url| Thumbnail { url: url.to_owned() });

    let office = today.publishing_office.as_deref().unwrap_or_default();

    Some(Embed {
        title: format!("🌤️ Today's Weather - {prefecture} {city}"),
        url,
        description,
        color: setting.swatch().to_decimal(),
        fields,
        thumbnail,
        footer: Footer {
            text: format!("{office} / Tsukumijima Weather API"),
        },
    })
}

/// `"9C / 15C"`, `"Max 15C"`, `"Min 9C"` or `"--"`.
/// Blank or null Celsius values count as missing.
pub fn format_temperature_range(temp: Option<&TemperatureRange>) -> String {
    fn celsius(reading: Option<&TemperatureReading>) -> Option<&str> {
        reading.and_then(|r| non_empty(r.celsius.as_deref()))
    }
    let min = temp.and_then(|t| celsius(t.min.as_ref()));
    let max = temp.and_then(|t| celsius(t.max.as_ref()));

    match (min, max) {
        (Some(min), Some(max)) => format!("{min}C / {max}C"),
        (None, Some(max)) => format!("Max {max}C"),
        (Some(min), None) => format!("Min {min}C"),
        (None, None) => "--".to_owned(),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
