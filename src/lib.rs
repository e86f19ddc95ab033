//! # Reducto
//!
//! A predictable state container for Rust.
//!
//! Reducto keeps the whole state of an application in a single [`Store`]. The
//! state only changes when an [`Action`] is dispatched, and the next state is
//! computed by a pure [`Reducer`] from the previous one.
//!
//! ## Store
//!
//! - `Store<S>` - Holds the state, runs the reducer and notifies listeners
//! - `create_store` - Builds a store, optionally through an [`Enhancer`]
//! - `Subscription` - Handle returned by `subscribe`, used to unsubscribe
//!
//! ## Composition
//!
//! Building blocks for growing a store beyond a single reducer:
//! - `combine_reducers` - One reducer over a keyed JSON state from many
//! - `apply_middleware` - An enhancer wrapping `dispatch` in middleware
//! - `bind_action_creators` - Action creators that dispatch what they create
//! - `compose` - Right-to-left function composition
//!
//! ```
//! use reducto::{Action, Result, Store};
//!
//! fn counter(state: Option<&i64>, action: &Action) -> Result<Option<i64>> {
//!     let count = state.copied().unwrap_or(0);
//!     Ok(Some(match action.action_type() {
//!         "INCREMENT" => count + 1,
//!         "DECREMENT" => count - 1,
//!         _ => count,
//!     }))
//! }
//!
//! let store = Store::new(counter).unwrap();
//! let _subscription = store.subscribe(|| println!("state changed"));
//!
//! store.dispatch(Action::new("INCREMENT")).unwrap();
//! store.dispatch(Action::new("INCREMENT")).unwrap();
//! store.dispatch(Action::new("DECREMENT")).unwrap();
//! assert_eq!(*store.get_state(), 1);
//! ```

pub mod action;
pub mod bind;
pub mod compose;
pub mod error;
pub mod middleware;
pub mod reducer;
pub mod store;

// Re-export main types for convenience
pub use action::Action;
pub use bind::{bind_action_creator, bind_action_creators, ActionCreators, BoundActionCreators};
pub use compose::{compose, compose_seeded, Func};
pub use error::{ReducerContractError, Result, StoreError};
pub use middleware::{
    apply_middleware, ApplyMiddleware, LoggerMiddleware, Middleware, MiddlewareApi,
};
pub use reducer::{boxed, combine_reducers, BoxedReducer, CombinedReducer, Reducer};
pub use store::{create_store, Dispatch, Enhancer, Store, StoreFactory, Subscription};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = Store::new(|state: Option<&u32>, action: &Action| -> Result<Option<u32>> {
            let count = state.copied().unwrap_or(0);
            Ok(Some(if action.is("INCREMENT") { count + 1 } else { count }))
        })
        .unwrap();
        assert_eq!(*store.get_state(), 0);
        store.dispatch(Action::new("INCREMENT")).unwrap();
        assert_eq!(*store.get_state(), 1);
    }
}
