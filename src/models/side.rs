use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "buy", alias = "BUY", alias = "Buy")]
    Buy,
    #[serde(rename = "sell", alias = "SELL", alias = "Sell")]
    Sell,
    #[serde(other, rename = "other")]
    Other,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let side = match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
            Side::Other => "—",
        };

        write!(f, "{}", side)
    }
}
