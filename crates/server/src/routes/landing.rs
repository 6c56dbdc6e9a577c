use axum::response::Html;

const LANDING_PAGE: &str = "<h1>Shop API</h1>\
<p>Resources: <code>/api/items</code>, <code>/api/products</code>. \
Health: <code>/api/health</code>.</p>";

/// GET / - Static informational page
pub async fn index() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
