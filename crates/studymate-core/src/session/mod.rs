//! Session domain module.
//!
//! A session is the persisted summary of one conversation, used for the
//! history list and for replaying a conversation's first question.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `date_label`: Relative date labels for history lists (`DateLabel`)
//! - `repository`: Repository trait for session persistence

mod date_label;
mod model;
mod repository;

// Re-export public API
pub use date_label::DateLabel;
pub use model::Session;
pub use repository::SessionRepository;
