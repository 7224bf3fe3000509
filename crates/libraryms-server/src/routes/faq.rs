//! FAQ search: `GET /api/faq?q=<query>`
//!
//! Returns matching entries plus per-category counts for the navigation grid.

use std::sync::Arc;

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use libraryms_core::faq::{self, FaqEntry};

use crate::state::AppState;

/// Build the FAQ router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/faq", get(search_faq))
}

#[derive(Debug, Deserialize)]
pub struct FaqQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FaqResponse {
    pub query: String,
    pub total: usize,
    pub entries: Vec<FaqEntry>,
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub id: &'static str,
    pub name: &'static str,
    pub count: usize,
}

async fn search_faq(Query(params): Query<FaqQuery>) -> Json<FaqResponse> {
    let query = params.q.unwrap_or_default();
    let hits = faq::filter(faq::CATALOG, &query);

    let categories = faq::CATEGORIES
        .iter()
        .map(|c| CategoryCount {
            id: c.id,
            name: c.name,
            count: faq::count_in_category(&hits, c.id),
        })
        .collect();

    Json(FaqResponse {
        total: hits.len(),
        entries: hits.into_iter().copied().collect(),
        categories,
        query,
    })
}
