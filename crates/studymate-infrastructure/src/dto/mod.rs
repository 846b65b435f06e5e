//! Data Transfer Objects for persistence.
//!
//! DTOs carry an explicit `version` so the on-disk format can evolve
//! independently of the domain models in `studymate-core`.

mod session;

pub use session::{SESSION_VERSION, SessionV1_0_0};
