//! Model builder passes.
//!
//! - [`registration`]: pass 1 - register every class name as a placeholder
//!   so forward references to not-yet-resolved bases can be detected
//! - [`resolution`]: pass 2 - resolve classes in dependency order, then
//!   free functions and file-scope variables

pub mod registration;
pub mod resolution;

pub use registration::{RegistrationOutput, RegistrationPass};
pub use resolution::ResolutionPass;
