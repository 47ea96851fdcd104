//! Rule compilation and match resolution for the anonymization engine.
//!
//! `compiler` turns the configured rules into the literal and pattern passes,
//! `tags` names the pattern rules' capture groups, and `resolver` decides what
//! each individual match is replaced with.

pub mod compiler;
pub mod resolver;
pub mod tags;
