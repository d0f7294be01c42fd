use serde::Deserialize;

use crate::pagination;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    pagination::DEFAULT_PAGE
}

fn default_limit() -> i64 {
    pagination::DEFAULT_LIMIT
}
