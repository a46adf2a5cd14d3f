//! HTTP service wrappers and their supporting policy objects.

pub mod members;
pub mod retry;
pub mod routes;

pub use members::{MemberService, RelationshipType, ServiceError};
pub use retry::{Backoff, RetryPolicy};
pub use routes::{RouteResolver, StaticRoutes};
