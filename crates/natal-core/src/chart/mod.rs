pub mod assembler;
pub mod types;

pub use assembler::ChartAssembler;
pub use types::{
    AnglePosition, Angles, Body, BodyFailure, BodyOutcome, BodyPosition, ChartMeta, ChartRequest,
    ChartResult, HouseCusp,
};
