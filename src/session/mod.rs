//! Runtime selection of installed module versions
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │  RequirementSet  │◀────│  SessionManager  │────▶│     Resolver     │
//! │  (constraints)   │     │     (façade)     │     │ (root/module/ver)│
//! └──────────────────┘     └──────────────────┘     └──────────────────┘
//!                             │            │
//!                             ▼            ▼
//!                 ┌──────────────────┐  ┌──────────────────┐
//!                 │ActivationRegistry│  │ ScratchWorkspace │
//!                 │ (one per module) │  │    (exposure)    │
//!                 └──────────────────┘  └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`manager`]: Session façade (`use_exact_version`, `register_requirement`, ...)
//! - [`registry`]: Active version per module and conflict handling policies
//! - [`resolver`]: Repository root list and first-match directory lookup
//! - [`workspace`]: Scratch directory lifecycle and directory exposure
//! - [`error`]: Session error type

pub mod error;
pub mod manager;
pub mod registry;
pub mod resolver;
pub mod workspace;

pub use error::SessionError;
pub use manager::SessionManager;
pub use registry::{Activation, ConflictCheck, ResolveAction};
pub use resolver::RepositoryRoots;
