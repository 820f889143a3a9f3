pub mod model;
pub mod planner;
pub mod report;
pub mod status;
pub mod validate;

pub use model::*;
