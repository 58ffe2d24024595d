use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Where the upstream bots get their USDT→EUR rate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FxSource {
    #[default]
    Auto,
    Manual,
}

impl FxSource {
    pub const ALL: [FxSource; 2] = [FxSource::Auto, FxSource::Manual];

    pub fn as_str(&self) -> &'static str {
        match self {
            FxSource::Auto => "auto",
            FxSource::Manual => "manual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FxSource::Auto => "auto",
            FxSource::Manual => "handmatig (fallback)",
        }
    }
}

impl Display for FxSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
