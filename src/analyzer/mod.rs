//! Heuristic Source Analysis
//!
//! Pure, regex-based extractors over fetched file text. These run before
//! and alongside the AI analysis: their results seed the fallback parse
//! path and the corpus statistics. Absence of matches is never an error.

mod dependencies;
mod endpoints;
mod functions;
mod imports;

pub use dependencies::extract_dependencies;
pub use endpoints::{EndpointMatch, extract_endpoints};
pub use functions::{FunctionMatch, extract_functions};
pub use imports::{ImportEdge, extract_imports};
