//! Monitoring module aggregate and its embedded sensors.
//!
//! Both types are a typed core plus an open map of extra fields that is
//! preserved verbatim on read and write.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::JsonMap;

/* --------------------------------------------------------------------------
   Field names
   -------------------------------------------------------------------------- */

pub const FIELD_MODULE_ID: &str = "moduleId";
pub const FIELD_LOCATION: &str = "location";
pub const FIELD_SENSORS: &str = "sensors";

pub const FIELD_SENSOR_ID: &str = "sensorId";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_VALUE: &str = "value";
pub const FIELD_TIMESTAMP: &str = "timestamp";

/// Sensor fields that must be present, in the order they are checked.
pub const REQUIRED_SENSOR_FIELDS: [&str; 4] =
    [FIELD_SENSOR_ID, FIELD_TYPE, FIELD_VALUE, FIELD_TIMESTAMP];

/* --------------------------------------------------------------------------
   Sensor kinds
   -------------------------------------------------------------------------- */

/// The fixed set of sensor types, each with an inclusive valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Temperature,
    Pressure,
    Vibration,
    Humidity,
}

impl SensorKind {
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Temperature,
        SensorKind::Pressure,
        SensorKind::Vibration,
        SensorKind::Humidity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Pressure => "pressure",
            SensorKind::Vibration => "vibration",
            SensorKind::Humidity => "humidity",
        }
    }

    /// Inclusive `(min, max)` bounds for readings of this kind.
    pub fn range(self) -> (f64, f64) {
        match self {
            SensorKind::Temperature => (-10.0, 100.0),
            SensorKind::Pressure => (0.0, 500.0),
            SensorKind::Vibration => (0.0, 5.0),
            SensorKind::Humidity => (0.0, 99.0),
        }
    }

    pub fn accepts(self, value: f64) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&value)
    }

    /// Comma-separated list of every valid kind, for error messages.
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|k| k.as_str() == s).ok_or(())
    }
}

/* --------------------------------------------------------------------------
   Aggregate types
   -------------------------------------------------------------------------- */

/// A single reading embedded in a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub sensor_id: String,
    #[serde(rename = "type")]
    pub kind: SensorKind,
    /// Kept as a JSON number so integers round-trip without gaining a `.0`.
    pub value: serde_json::Number,
    /// Stored exactly as submitted once it has passed the ISO-8601 check.
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl Sensor {
    pub fn value_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// JSON object form, used as the base for field-level merges.
    pub fn to_json_map(&self) -> JsonMap {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => JsonMap::new(),
        }
    }
}

/// A monitoring module: the unit of persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub module_id: String,
    pub location: String,
    pub sensors: Vec<Sensor>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl Module {
    pub fn sensor(&self, sensor_id: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.sensor_id == sensor_id)
    }

    pub fn sensor_position(&self, sensor_id: &str) -> Option<usize> {
        self.sensors.iter().position(|s| s.sensor_id == sensor_id)
    }
}

/// Acknowledgement returned by delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub message: String,
}

impl Confirmation {
    pub fn module_deleted(module_id: &str) -> Self {
        Self {
            message: format!("Module with moduleId {module_id} deleted."),
        }
    }

    pub fn sensor_deleted(module_id: &str, sensor_id: &str) -> Self {
        Self {
            message: format!("Sensor with sensorId {sensor_id} deleted from module {module_id}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_parses_only_known_names() {
        assert_eq!("humidity".parse::<SensorKind>(), Ok(SensorKind::Humidity));
        assert!("Humidity".parse::<SensorKind>().is_err());
        assert!("light".parse::<SensorKind>().is_err());
    }

    #[test]
    fn ranges_are_inclusive() {
        assert!(SensorKind::Temperature.accepts(-10.0));
        assert!(SensorKind::Temperature.accepts(100.0));
        assert!(!SensorKind::Temperature.accepts(100.5));
        assert!(SensorKind::Vibration.accepts(0.0));
        assert!(!SensorKind::Vibration.accepts(-0.1));
        assert!(SensorKind::Humidity.accepts(99.0));
        assert!(!SensorKind::Humidity.accepts(99.01));
    }

    #[test]
    fn valid_list_names_every_kind() {
        assert_eq!(
            SensorKind::valid_list(),
            "temperature, pressure, vibration, humidity"
        );
    }

    #[test]
    fn extra_fields_survive_serialization() {
        let raw = json!({
            "moduleId": "M1",
            "location": "Plant A",
            "sensors": [{
                "sensorId": "S1",
                "type": "humidity",
                "value": 45,
                "timestamp": "2024-01-01T00:00:00Z",
                "unit": "%"
            }],
            "owner": "ops"
        });
        let module: Module = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(module.extra["owner"], "ops");
        assert_eq!(module.sensors[0].extra["unit"], "%");
        assert_eq!(serde_json::to_value(&module).unwrap(), raw);
    }
}
