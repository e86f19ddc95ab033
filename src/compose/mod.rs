//! Right-to-left function composition, used to chain middleware layers.

mod compose;

pub use compose::{compose, compose_seeded, Func};
