//! CLI command implementations.

pub mod common;
pub mod gates;
pub mod inspect;
pub mod run;
pub mod version;
