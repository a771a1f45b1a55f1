//! Recommendation stage: four candidate exercises plus a capability
//! assessment, steered by the rule engine's targets.

pub mod orchestrator;
pub mod prompt;
pub mod schema;
pub mod types;

pub use orchestrator::*;
pub use prompt::*;
pub use schema::*;
pub use types::*;
