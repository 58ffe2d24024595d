use anyhow::{anyhow, Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Tag the upstream trading system puts on every row it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    Crypto,
    Stocks,
    #[serde(other)]
    Other,
}

impl Agent {
    pub const KNOWN: [Agent; 2] = [Agent::Crypto, Agent::Stocks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Agent::Crypto => "crypto",
            Agent::Stocks => "stocks",
            Agent::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Agent::Crypto => "Crypto",
            Agent::Stocks => "Aandelen",
            Agent::Other => "Overig",
        }
    }
}

impl Display for Agent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Agent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "crypto" => Ok(Agent::Crypto),
            "stocks" => Ok(Agent::Stocks),
            other => Err(anyhow!("Unknown agent `{}`, expected crypto or stocks.", other)),
        }
    }
}
