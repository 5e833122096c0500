//! Pure computation over fetched records: progress math, windowed
//! aggregation, report synthesis. Handlers own all I/O.

pub mod aggregate;
pub mod correlation;
pub mod format;
pub mod insights;
pub mod progress;

use serde::Serialize;

/// A single recommendation/insight card shown to the user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Insight {
    pub icon: String,
    pub title: String,
    pub description: String,
}
