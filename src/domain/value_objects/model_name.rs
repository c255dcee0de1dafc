use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hosted chat models a client may ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelName {
    #[default]
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
}

impl ModelName {
    pub const ALL: [ModelName; 3] = [
        ModelName::Gemini25Pro,
        ModelName::Gemini25Flash,
        ModelName::Gemini20Flash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::Gemini25Pro => "gemini-2.5-pro",
            ModelName::Gemini25Flash => "gemini-2.5-flash",
            ModelName::Gemini20Flash => "gemini-2.0-flash",
        }
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| format!("Unknown model: {}", s))
    }
}
