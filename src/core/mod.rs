pub mod planner;
pub mod prompt;
pub mod schema;

pub use crate::domain::model::{Food, Movie, PlanRequest, PlanResponse, Transport};
pub use crate::domain::ports::TextGenerator;
pub use crate::utils::error::Result;
