pub mod enums;
pub mod exercise;
pub mod patient;
pub mod records;

pub use exercise::*;
pub use patient::*;
pub use records::*;
