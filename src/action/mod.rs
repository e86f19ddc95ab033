//! Actions: the only way to request a state change.

mod action;

pub use action::Action;
pub(crate) use action::{json_kind, probe_type, INIT};
