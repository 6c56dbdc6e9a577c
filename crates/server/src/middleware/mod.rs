//! HTTP middleware

pub mod audit;
pub mod auth;
pub mod body;
pub mod metrics;
pub mod rate_limit;
pub mod readiness;
pub mod request_id;
pub mod request_log;

pub use audit::audit_middleware;
pub use auth::{ApiKeyAuth, auth_middleware};
pub use body::{JsonBody, json_body_middleware};
pub use metrics::metrics_middleware;
pub use rate_limit::{create_rate_limiter, rate_limit_middleware};
pub use readiness::readiness_middleware;
pub use request_id::request_id_middleware;
pub use request_log::request_log_middleware;
