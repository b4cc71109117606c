// Service layer for the Rally client
pub mod api_client;
pub mod query_cache;
pub mod mutation;
pub mod session;
pub mod match_service;
pub mod group_service;

#[cfg(test)]
mod match_service_test;
#[cfg(test)]
pub(crate) mod test_support;

pub use api_client::{ApiClient, RetryConfig};
pub use query_cache::{QueryCache, QueryKey};
pub use mutation::{MutationGate, MutationGuard};
pub use session::{Session, SessionState};
pub use match_service::MatchService;
pub use group_service::GroupService;
