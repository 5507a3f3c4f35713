use std::fmt;

use crate::config::LampMode;

pub const MIN_KELVIN: u32 = 2700;
pub const MAX_KELVIN: u32 = 6500;

/// Colour sent when it is not going to rain, and the embed swatch used when
/// the lamp runs in colour-temperature mode.
pub const NO_RAIN_ORANGE: Rgb = Rgb::new(255, 127, 0);

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the colour into `0xRRGGBB`, the form Discord expects.
    pub fn to_decimal(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

// ---------------------------------------------------------------------------
// Brightness
// ---------------------------------------------------------------------------

/// Lamp brightness, always within 1–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness(u8);

impl Brightness {
    pub const MAX: Brightness = Brightness(100);

    pub fn new(value: i64) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    /// Parses a user-supplied value; anything non-numeric means full brightness.
    pub fn parse(raw: &str) -> Self {
        raw.trim().parse::<i64>().map_or(Self::MAX, Self::new)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Step palette from warm orange (dry) to deep blue (wet).
/// Bucket upper bounds are inclusive: 20 is still yellow.
pub fn rain_to_rgb(level: u32) -> Rgb {
    match level {
        0 => NO_RAIN_ORANGE,
        1..=20 => Rgb::new(255, 255, 0),
        21..=40 => Rgb::new(127, 255, 0),
        41..=60 => Rgb::new(0, 255, 255),
        61..=80 => Rgb::new(0, 127, 255),
        _ => Rgb::new(0, 0, 255),
    }
}

/// 0 % → 2700 K (warm) … 100 % → 6500 K (cool), truncated.
pub fn rain_to_color_temperature(level: u32) -> u32 {
    let level = level.min(100);
    MIN_KELVIN + (MAX_KELVIN - MIN_KELVIN) * level / 100
}

// ---------------------------------------------------------------------------
// LampSetting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampColor {
    Rgb(Rgb),
    /// Kelvin, within `MIN_KELVIN..=MAX_KELVIN`.
    Temperature(u32),
}

/// What the lamp should show for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LampSetting {
    pub rain_level: u32,
    pub brightness: Brightness,
    pub color: LampColor,
}

impl LampSetting {
    pub fn from_rain_level(rain_level: u32, mode: LampMode, brightness: Brightness) -> Self {
        let color = match mode {
            LampMode::Rgb => LampColor::Rgb(rain_to_rgb(rain_level)),
            LampMode::ColorTemperature => {
                LampColor::Temperature(rain_to_color_temperature(rain_level))
            }
        };
        Self { rain_level, brightness, color }
    }

    /// RGB used for the notification swatch.
    pub fn swatch(&self) -> Rgb {
        match self.color {
            LampColor::Rgb(rgb) => rgb,
            LampColor::Temperature(_) => NO_RAIN_ORANGE,
        }
    }
}

impl fmt::Display for LampColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LampColor::Rgb(Rgb { r, g, b }) => write!(f, "RGB({r},{g},{b})"),
            LampColor::Temperature(kelvin) => write!(f, "Color Temp: {kelvin}K"),
        }
    }
}
