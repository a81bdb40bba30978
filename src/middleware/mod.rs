pub mod auth;
pub mod context;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use context::{RequestContext, CSRF_HEADER};
pub use response::{ApiResponse, ApiResult};
