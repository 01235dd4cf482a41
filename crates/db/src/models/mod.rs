//! Row structs for persisted tables.

pub mod module;
