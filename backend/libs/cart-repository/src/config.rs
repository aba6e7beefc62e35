//! Repository settings loaded from environment variables

use db_pool::env_utils::parse_env_with_default;
use std::time::Duration;

const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_METRICS_LABEL: &str = "cart-repository";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Upper bound for a single query, and for each step (begin, unit of
    /// work, commit, rollback) of the transaction helper
    pub query_timeout: Duration,
    /// Value of the `repository` label on exported metrics
    pub metrics_label: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
            metrics_label: DEFAULT_METRICS_LABEL.to_string(),
        }
    }
}

impl RepositoryConfig {
    /// Read `CART_REPO_QUERY_TIMEOUT_MS` and `CART_REPO_METRICS_LABEL`
    pub fn from_env() -> Self {
        Self {
            query_timeout: Duration::from_millis(parse_env_with_default(
                "CART_REPO_QUERY_TIMEOUT_MS",
                DEFAULT_QUERY_TIMEOUT_MS,
            )),
            metrics_label: parse_env_with_default(
                "CART_REPO_METRICS_LABEL",
                DEFAULT_METRICS_LABEL.to_string(),
            ),
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }
}
