//! Offset pagination for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{DEFAULT_LIMIT, DEFAULT_SKIP, MAX_LIMIT};

/// `?skip=&limit=` query parameters
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// Rows to skip
    #[serde(default = "default_skip")]
    pub skip: u64,
    /// Rows to return, at most 100
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_skip() -> u64 {
    DEFAULT_SKIP
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl PaginationParams {
    /// Limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_LIMIT)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}
