use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Router,
};
use chrono::Utc;

use blogicum_core::{paginate, FeedQuery, FeedScope, PageRequest, POSTS_PER_PAGE};

use crate::error::AppError;
use crate::forms::PageQuery;
use crate::render;
use crate::session::Viewer;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/category/{slug}/", get(category))
}

async fn index(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let request = PageRequest::parse(query.page.as_deref())?;
    let entries = blogicum_db::fetch_feed(&state.pool, &FeedQuery::all(Utc::now())).await?;
    let page = paginate(entries, request, POSTS_PER_PAGE)?;

    Ok(Html(render::index_page(viewer.user(), &page)))
}

async fn category(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let category = blogicum_db::get_published_category(&state.pool, &slug).await?;
    let request = PageRequest::parse(query.page.as_deref())?;
    let feed = FeedQuery::new(FeedScope::Category(category.id), Utc::now());
    let entries = blogicum_db::fetch_feed(&state.pool, &feed).await?;
    let page = paginate(entries, request, POSTS_PER_PAGE)?;

    Ok(Html(render::category_page(viewer.user(), &category, &page)))
}
