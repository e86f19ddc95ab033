//! The store: one state, one reducer, and the listeners to notify.
//!
//! Dispatches never nest inside a reducer, and listener changes made during a
//! dispatch take effect from the next one.

mod enhancer;
mod listeners;
mod store;

pub use enhancer::{Enhancer, StoreFactory};
pub use listeners::Subscription;
pub use store::{create_store, Dispatch, Store};
pub(crate) use store::WeakStore;
