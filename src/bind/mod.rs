//! Binding action creators to a dispatch function.

mod bind;

pub use bind::{
    bind_action_creator, bind_action_creators, ActionCreator, ActionCreators, BoundActionCreator,
    BoundActionCreators,
};
