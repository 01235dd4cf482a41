//! Validation engine for modules and sensors.
//!
//! Pure functions over raw JSON payloads. Each check short-circuits, so a
//! caller only ever sees the first problem. On success the payload is
//! returned in its typed form, ready to persist.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::ValidationError;
use crate::module::{
    Module, Sensor, SensorKind, FIELD_LOCATION, FIELD_MODULE_ID, FIELD_SENSORS, FIELD_SENSOR_ID,
    FIELD_TIMESTAMP, FIELD_TYPE, FIELD_VALUE, REQUIRED_SENSOR_FIELDS,
};
use crate::types::JsonMap;

/// Local date-time layouts accepted when no UTC offset is given.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The same layouts followed by an offset, with or without a colon.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

/// Whether `s` is an ISO-8601 date or date-time. A trailing `Z` is the
/// same as `+00:00` for every accepted layout.
pub fn is_iso8601(s: &str) -> bool {
    let normalized = match s.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => s.to_string(),
    };
    if DateTime::parse_from_rfc3339(&normalized).is_ok() {
        return true;
    }
    if OFFSET_DATETIME_FORMATS
        .iter()
        .any(|f| DateTime::parse_from_str(&normalized, f).is_ok())
    {
        return true;
    }
    if NAIVE_DATETIME_FORMATS
        .iter()
        .any(|f| NaiveDateTime::parse_from_str(s, f).is_ok())
    {
        return true;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Validate one sensor payload against the ids already taken in its module.
///
/// When validating an in-place update, `existing_ids` must exclude the
/// sensor being updated so it can keep its own id.
///
/// Checks run in this order: required fields, id uniqueness, type, value
/// range, timestamp format.
pub fn validate_sensor(
    raw: &Value,
    existing_ids: &HashSet<String>,
) -> Result<Sensor, ValidationError> {
    let Value::Object(fields) = raw else {
        return Err(ValidationError::MalformedInput(
            "Each sensor must be a JSON object.".to_string(),
        ));
    };

    for field in REQUIRED_SENSOR_FIELDS {
        if present(fields, field).is_none() {
            return Err(ValidationError::MissingSensorField(field));
        }
    }

    let sensor_id = match &fields[FIELD_SENSOR_ID] {
        Value::String(id) => id.clone(),
        _ => {
            return Err(ValidationError::MalformedInput(
                "sensorId must be a string.".to_string(),
            ))
        }
    };

    if existing_ids.contains(&sensor_id) {
        return Err(ValidationError::DuplicateSensorId(sensor_id));
    }

    let kind = match &fields[FIELD_TYPE] {
        Value::String(name) => name.parse::<SensorKind>().map_err(|()| name.clone()),
        other => Err(other.to_string()),
    }
    .map_err(|kind| ValidationError::InvalidEnum {
        kind,
        valid: SensorKind::valid_list(),
    })?;

    let value = match &fields[FIELD_VALUE] {
        Value::Number(n) => n.clone(),
        _ => return Err(ValidationError::NonNumericValue { sensor_id }),
    };
    let (min, max) = kind.range();
    if !value.as_f64().is_some_and(|v| kind.accepts(v)) {
        return Err(ValidationError::OutOfRange {
            value,
            kind: kind.to_string(),
            min,
            max,
        });
    }

    let timestamp = match &fields[FIELD_TIMESTAMP] {
        Value::String(ts) if is_iso8601(ts) => ts.clone(),
        _ => return Err(ValidationError::InvalidTimestamp { sensor_id }),
    };

    Ok(Sensor {
        sensor_id,
        kind,
        value,
        timestamp,
        extra: extra_fields(fields, &REQUIRED_SENSOR_FIELDS),
    })
}

/// Validate a submitted `sensors` field.
///
/// Ids are tracked left to right, so a duplicate inside the same list is
/// rejected. The first invalid sensor rejects the whole list.
pub fn validate_sensor_list(raw: &Value) -> Result<Vec<Sensor>, ValidationError> {
    let Value::Array(items) = raw else {
        return Err(ValidationError::MalformedInput(
            "The sensors field must be a list.".to_string(),
        ));
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut sensors = Vec::with_capacity(items.len());
    for item in items {
        let sensor = validate_sensor(item, &seen)?;
        seen.insert(sensor.sensor_id.clone());
        sensors.push(sensor);
    }
    Ok(sensors)
}

/// Structural validation for a module creation request.
pub fn validate_module(raw: &Value) -> Result<Module, ValidationError> {
    let Value::Object(fields) = raw else {
        return Err(ValidationError::MalformedInput(
            "Module must be a JSON object.".to_string(),
        ));
    };

    let module_id = required_text(fields, FIELD_MODULE_ID)?;
    let location = required_text(fields, FIELD_LOCATION)?;
    let sensors = match present(fields, FIELD_SENSORS) {
        Some(list) => validate_sensor_list(list)?,
        None => return Err(ValidationError::MissingModuleField(FIELD_SENSORS)),
    };

    Ok(Module {
        module_id,
        location,
        sensors,
        extra: extra_fields(fields, &[FIELD_MODULE_ID, FIELD_LOCATION, FIELD_SENSORS]),
    })
}

/// Validate a partial module update addressed to `module_id`.
///
/// Only fields present in the patch are checked. The returned map is what
/// gets merged into the stored document; a submitted `sensors` list is
/// replaced by its validated form.
pub fn validate_module_patch(module_id: &str, raw: &Value) -> Result<JsonMap, ValidationError> {
    let Value::Object(fields) = raw else {
        return Err(ValidationError::MalformedInput(
            "Module update must be a JSON object.".to_string(),
        ));
    };
    let mut patch = fields.clone();

    if let Some(id) = fields.get(FIELD_MODULE_ID) {
        if id.as_str() != Some(module_id) {
            return Err(ValidationError::MalformedInput(format!(
                "moduleId is immutable; expected {module_id}."
            )));
        }
    }

    if fields.contains_key(FIELD_LOCATION) {
        required_text(fields, FIELD_LOCATION)?;
    }

    if let Some(list) = fields.get(FIELD_SENSORS) {
        let sensors = validate_sensor_list(list)?;
        let normalized = serde_json::to_value(&sensors)
            .map_err(|e| ValidationError::MalformedInput(e.to_string()))?;
        patch.insert(FIELD_SENSORS.to_string(), normalized);
    }

    Ok(patch)
}

/// Overlay a partial sensor update on the stored sensor.
///
/// The result is an unvalidated candidate; run it through
/// [`validate_sensor`] before persisting.
pub fn merge_sensor_patch(existing: &Sensor, raw: &Value) -> Result<Value, ValidationError> {
    let Value::Object(patch) = raw else {
        return Err(ValidationError::MalformedInput(
            "Sensor update must be a JSON object.".to_string(),
        ));
    };
    let mut candidate = existing.to_json_map();
    for (key, value) in patch {
        candidate.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(candidate))
}

fn present<'a>(fields: &'a JsonMap, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|v| !v.is_null())
}

fn required_text(fields: &JsonMap, name: &'static str) -> Result<String, ValidationError> {
    match present(fields, name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ValidationError::MissingModuleField(name)),
    }
}

fn extra_fields(fields: &JsonMap, known: &[&str]) -> JsonMap {
    fields
        .iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
