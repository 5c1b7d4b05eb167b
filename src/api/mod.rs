//! API Module
//!
//! HTTP handlers and routing for the backing-store daemon. This surface is
//! the "scripting layer" of the remote engine: every atomic primitive the
//! remote contract needs executes inside one handler here.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
