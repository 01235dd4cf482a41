/// Errors returned by the module store.
///
/// Validation and not-found failures are caller-recoverable. `Storage`
/// carries whatever the persistence layer reported, uncategorized.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A module with moduleId {0} already exists.")]
    DuplicateModule(String),

    #[error("Module with moduleId {0} not found.")]
    ModuleNotFound(String),

    #[error("Sensor with sensorId {sensor_id} not found in module {module_id}.")]
    SensorNotFound {
        module_id: String,
        sensor_id: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// True for either flavour of not-found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ModuleNotFound(_) | CoreError::SensorNotFound { .. }
        )
    }
}

/// A rejected module or sensor payload.
///
/// Only the first failing check is ever reported.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required sensor field is absent or null.
    #[error("{0} is required in every sensor.")]
    MissingSensorField(&'static str),

    /// A required module field is absent, null, empty or not a string.
    #[error("The {0} field is required.")]
    MissingModuleField(&'static str),

    #[error("Invalid sensor type: {kind}. Must be one of [{valid}].")]
    InvalidEnum { kind: String, valid: String },

    #[error("Value {value} for sensor type {kind} must be between {min} and {max}.")]
    OutOfRange {
        value: serde_json::Number,
        kind: String,
        min: f64,
        max: f64,
    },

    #[error("Value for sensor {sensor_id} must be a number.")]
    NonNumericValue { sensor_id: String },

    #[error("Invalid timestamp format for sensor {sensor_id}. Must be ISO 8601.")]
    InvalidTimestamp { sensor_id: String },

    #[error("sensorId {0} already exists in this module.")]
    DuplicateSensorId(String),

    #[error("{0}")]
    MalformedInput(String),
}
