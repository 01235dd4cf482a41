pub mod module;
pub mod sensor;
