//! # Domain Layer
//!
//! Message model, grammar, field rules and verification rules.
//! No I/O; hashing, randomness and URI syntax come in through ports.

pub mod context;
pub mod errors;
pub mod message;
pub mod parser;
pub mod validators;
pub mod verification;
