//! Safety verification stage: three constraint checks, a decision per
//! proposed exercise and the final four-exercise prescription.

pub mod consistency;
pub mod orchestrator;
pub mod prompt;
pub mod schema;
pub mod types;

pub use consistency::*;
pub use orchestrator::*;
pub use prompt::*;
pub use schema::*;
pub use types::*;
