//! Reducers and the reducer combinator.
//!
//! A [`Reducer`] computes the next state from the previous one and an action.
//! [`combine_reducers`] builds one reducer over a keyed JSON state out of many
//! smaller ones, checking each of them against the reducer contract up front.

mod combine;
mod reducer;

pub use combine::{combine_reducers, CombinedReducer};
pub use reducer::{boxed, BoxedReducer, Reducer};
