use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Tsukumijima forecast: GET /api/forecast/city/{city_code}
//
// Only the fields the lamp and the notification read are modelled. Everything
// except `forecasts[].chanceOfRain` is optional so a sparse payload still
// deserialises; a payload without any usable day is rejected by the caller.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub forecasts: Vec<DailyForecast>,

    #[serde(default)]
    pub location: Location,
}

impl Forecast {
    /// Today's entry (index 0), if the provider sent one.
    pub fn today(&self) -> Option<&DailyForecast> {
        self.forecasts.first()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub chance_of_rain: ChanceOfRain,

    /// Short human description, e.g. `"晴のち曇"`.
    #[serde(default)]
    pub telop: Option<String>,

    #[serde(default)]
    pub temperature: Option<TemperatureRange>,

    #[serde(default)]
    pub detail: Option<Detail>,

    #[serde(default)]
    pub image: Option<Image>,

    #[serde(default)]
    pub publishing_office: Option<String>,

    #[serde(default)]
    pub link_url: Option<String>,
}

/// Percentage strings per 6-hour slot, e.g. `"40%"`, `"--%"` or `""`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChanceOfRain {
    #[serde(rename = "T00_06", default)]
    pub t00_06: Option<String>,
    #[serde(rename = "T06_12", default)]
    pub t06_12: Option<String>,
    #[serde(rename = "T12_18", default)]
    pub t12_18: Option<String>,
    #[serde(rename = "T18_24", default)]
    pub t18_24: Option<String>,
}

impl ChanceOfRain {
    /// The slots that make up the daylight maximum, labelled for display.
    /// `T00_06` is intentionally left out.
    pub fn daylight_slots(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("06-12", self.t06_12.as_deref()),
            ("12-18", self.t12_18.as_deref()),
            ("18-24", self.t18_24.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemperatureRange {
    #[serde(default)]
    pub min: Option<TemperatureReading>,
    #[serde(default)]
    pub max: Option<TemperatureReading>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemperatureReading {
    /// Celsius as text; `null` before the value is published.
    #[serde(default)]
    pub celsius: Option<String>,
    #[serde(default)]
    pub fahrenheit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Detail {
    #[serde(default, alias = "weatherDetail")]
    pub weather: Option<String>,
    #[serde(default)]
    pub wind: Option<String>,
    #[serde(default)]
    pub wave: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub lat: Option<Coordinate>,
    #[serde(default)]
    pub lon: Option<Coordinate>,
}

// ---------------------------------------------------------------------------
// Coordinate
//
// Latitude/longitude show up both as JSON numbers and as strings depending on
// the endpoint version. Untagged lets serde accept either.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Number(v) => write!(f, "{v}"),
            Coordinate::Text(v) => f.write_str(v),
        }
    }
}
