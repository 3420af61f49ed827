//! Wire schema for the market-data API.
//!
//! The upstream reports fields in SCREAMING_SNAKE_CASE; a curated subset is
//! kept and re-exposed unchanged to API consumers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Latest tick for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AssetTick {
    #[serde(rename = "TYPE")]
    pub kind: String,
    pub market: String,
    pub instrument: String,
    pub value: f64,
    pub value_flag: String,
    pub value_last_update_ts: i64,
    pub current_hour_volume: f64,
    pub current_hour_open: f64,
    pub current_hour_high: f64,
    pub current_hour_low: f64,
    pub current_hour_change: f64,
    pub current_hour_change_percentage: f64,
}

/// Envelope the upstream wraps tick lookups in, keyed by instrument.
#[derive(Debug, Deserialize)]
pub(crate) struct TickEnvelope {
    #[serde(rename = "Data")]
    pub data: HashMap<String, AssetTick>,
}

#[cfg(test)]
pub(crate) const SAMPLE_TICK_JSON: &str = r#"{
    "TYPE": "1101",
    "MARKET": "cadli",
    "INSTRUMENT": "BTC-BRL",
    "VALUE": 612345.17,
    "VALUE_FLAG": "UP",
    "VALUE_LAST_UPDATE_TS": 1735689600,
    "CURRENT_HOUR_VOLUME": 1532.4,
    "CURRENT_HOUR_OPEN": 610000.0,
    "CURRENT_HOUR_HIGH": 613500.0,
    "CURRENT_HOUR_LOW": 609800.5,
    "CURRENT_HOUR_CHANGE": 2345.17,
    "CURRENT_HOUR_CHANGE_PERCENTAGE": 0.38
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_upstream_envelope() {
        let body = format!(r#"{{"Data":{{"BTC-BRL":{SAMPLE_TICK_JSON}}},"Err":{{}}}}"#);
        let envelope: TickEnvelope = serde_json::from_str(&body).unwrap();
        let tick = &envelope.data["BTC-BRL"];

        assert_eq!(tick.instrument, "BTC-BRL");
        assert_eq!(tick.value, 612345.17);
        assert_eq!(tick.value_flag, "UP");
    }

    #[test]
    fn reserializes_with_upstream_field_names() {
        let tick: AssetTick = serde_json::from_str(SAMPLE_TICK_JSON).unwrap();
        let json = serde_json::to_value(&tick).unwrap();

        assert!(json.get("VALUE").is_some());
        assert!(json.get("CURRENT_HOUR_CHANGE_PERCENTAGE").is_some());
        assert!(json.get("value").is_none());
    }
}
