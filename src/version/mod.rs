//! Version parsing and constraint evaluation
//!
//! # Modules
//!
//! - [`identifier`]: `major.minor.patch[-label]` identifiers with ordering and compatibility
//! - [`requirement`]: operator + version constraints tagged with their origin
//! - [`requirement_set`]: per-module requirement accumulation and evaluation
//! - [`error`]: Parse errors for versions and requirements

pub mod error;
pub mod identifier;
pub mod requirement;
pub mod requirement_set;

pub use error::VersionError;
pub use identifier::VersionIdentifier;
pub use requirement::{Operator, Requirement};
pub use requirement_set::{RequirementSet, SatisfactionMode};
