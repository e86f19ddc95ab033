//! Middleware system for the store
//!
//! Middleware sits between `dispatch` and the reducer, allowing side effects,
//! logging and other cross-cutting concerns to be added without touching
//! reducers.
//!
//! ## Design
//!
//! ```text
//! dispatch → Middleware Chain → native dispatch → Reducer → State → Listeners
//! ```
//!
//! [`apply_middleware`] is an [`Enhancer`](crate::Enhancer): it wraps the store
//! factory so that every store it builds has its dispatch replaced by the
//! composed chain.

mod logger;
mod middleware;

pub use logger::LoggerMiddleware;
pub use middleware::{
    apply_middleware, ApplyMiddleware, BoxedMiddleware, DispatchLayer, Middleware, MiddlewareApi,
};
