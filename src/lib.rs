//! Select one of several side-by-side installed module versions at runtime.
//!
//! Versions are installed under `<root>/<module>/<version>/`. A
//! [`SessionManager`] resolves a requested version against the requirements
//! registered by its callers and exposes the chosen directory inside a
//! scratch workspace that sits on the module search path.

pub mod config;
pub mod logging;
pub mod session;
pub mod version;

pub use config::SessionConfig;
pub use session::{SessionError, SessionManager};
