// Core models
pub mod user;
pub mod group;
pub mod match_model;
pub mod stats;

// Re-export commonly used types
pub use user::*;
pub use group::*;
pub use match_model::*;
pub use stats::*;
