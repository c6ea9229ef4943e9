pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod router;
