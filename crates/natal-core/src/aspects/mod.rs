pub mod calculator;
pub mod types;

pub use calculator::{angular_distance, find_aspects, AspectCalculator, DEFAULT_ASPECTS};
pub use types::{AspectCore, AspectDefinition, AspectKind, AspectMatch, AspectPoint};
