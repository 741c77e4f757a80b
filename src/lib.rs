pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::adapters::{gemini::GeminiClient, http::build_router};
pub use crate::config::AppConfig;
pub use crate::core::planner::PlanHandler;
pub use crate::domain::model::{Food, Movie, PlanRequest, PlanResponse, Transport};
pub use crate::utils::error::{PlannerError, Result};
