// loganon-core/src/engines/mod.rs
//! Concrete implementations of the `AnonymizationEngine` trait.
//!
//! Each engine is a separate file within this directory and is declared here
//! with `pub mod <engine_name>;`.

pub mod regex_engine;
