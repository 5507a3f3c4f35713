use serde::{Deserialize, Serialize};

use crate::lamp::{Brightness, Rgb};

/// `statusCode` SwitchBot returns when a command was accepted.
pub const STATUS_SUCCESS: i64 = 100;

// ---------------------------------------------------------------------------
// Send command: POST /v1.1/devices/{device_id}/commands
// ---------------------------------------------------------------------------

/// Request body for the commands endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCommand {
    /// e.g. `"setBrightness"`, `"setColor"`, `"turnOn"`.
    pub command: String,

    /// Command argument; `"default"` for commands that take none.
    pub parameter: String,

    /// Always `"command"` for built-in device commands.
    pub command_type: String,
}

impl DeviceCommand {
    pub fn new(command: &str, parameter: impl Into<String>) -> Self {
        Self {
            command: command.to_owned(),
            parameter: parameter.into(),
            command_type: "command".to_owned(),
        }
    }

    pub fn set_brightness(brightness: Brightness) -> Self {
        Self::new("setBrightness", brightness.to_string())
    }

    /// Parameter format is `"R:G:B"`.
    pub fn set_color(rgb: Rgb) -> Self {
        Self::new("setColor", format!("{}:{}:{}", rgb.r, rgb.g, rgb.b))
    }

    pub fn set_color_temperature(kelvin: u32) -> Self {
        Self::new("setColorTemperature", kelvin.to_string())
    }

    pub fn turn_on() -> Self {
        Self::new("turnOn", "default")
    }
}

/// Response envelope shared by every v1.1 endpoint:
///
/// `{ "statusCode": 100, "body": {}, "message": "success" }`
///
/// A 2xx HTTP status does not imply success; `statusCode` must be 100.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub status_code: i64,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

impl CommandResponse {
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_SUCCESS
    }
}
