//! Score normalisation: pure functions turning raw assessment values into
//! ages, STS benchmark categories, KOOS/WOMAC section scores and the
//! position-relevant question buckets.

pub mod age;
pub mod benchmark;
pub mod questionnaire;

pub use age::*;
pub use benchmark::*;
pub use questionnaire::*;

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
