//! Classification labels attached to bars.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Market sentiment for a single bar.
///
/// Serialized as SCREAMING_SNAKE_CASE strings — the response wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

/// Suggested action for a single bar, derived from RSI thresholds alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

/// Outlier label produced by the anomaly detector.
///
/// Serializes as the conventional integer encoding: -1 anomalous, 1 normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyFlag {
    Anomalous,
    Normal,
}

impl AnomalyFlag {
    pub fn as_i8(self) -> i8 {
        match self {
            AnomalyFlag::Anomalous => -1,
            AnomalyFlag::Normal => 1,
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(AnomalyFlag::Anomalous),
            1 => Some(AnomalyFlag::Normal),
            _ => None,
        }
    }

    pub fn is_anomalous(self) -> bool {
        self == AnomalyFlag::Anomalous
    }
}

impl Serialize for AnomalyFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

impl<'de> Deserialize<'de> for AnomalyFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i8::deserialize(deserializer)?;
        AnomalyFlag::from_i8(value)
            .ok_or_else(|| D::Error::custom(format!("invalid anomaly flag: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_wire_format() {
        assert_eq!(
            serde_json::to_string(&Sentiment::Bullish).unwrap(),
            "\"BULLISH\""
        );
        assert_eq!(serde_json::to_string(&Action::Hold).unwrap(), "\"HOLD\"");
    }

    #[test]
    fn anomaly_flag_integer_encoding() {
        assert_eq!(serde_json::to_string(&AnomalyFlag::Anomalous).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&AnomalyFlag::Normal).unwrap(), "1");

        let flag: AnomalyFlag = serde_json::from_str("-1").unwrap();
        assert_eq!(flag, AnomalyFlag::Anomalous);
        assert!(serde_json::from_str::<AnomalyFlag>("0").is_err());
    }
}
