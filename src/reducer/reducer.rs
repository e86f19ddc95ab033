use crate::action::Action;
use crate::error::Result;
use std::rc::Rc;

/// A pure state transition.
///
/// `state` is `None` only while a store is being primed without preloaded state
/// (or when a combinator probes a sub-reducer). Returning `Ok(None)` is a
/// contract violation: for unknown actions, including the store's reserved
/// ones, a reducer returns the state it was given, or its initial state when it
/// was given none.
///
/// Any `Fn(Option<&S>, &Action) -> Result<Option<S>>` is a reducer:
///
/// ```
/// use reducto::{Action, Reducer, Result};
///
/// let counter = |state: Option<&i64>, action: &Action| -> Result<Option<i64>> {
///     let count = state.copied().unwrap_or(0);
///     Ok(Some(if action.is("INCREMENT") { count + 1 } else { count }))
/// };
///
/// assert_eq!(counter.reduce(None, &Action::new("INCREMENT")), Ok(Some(1)));
/// ```
pub trait Reducer<S> {
    fn reduce(&self, state: Option<&S>, action: &Action) -> Result<Option<S>>;

    /// Reduce a state held by a store.
    ///
    /// Returning the given `Rc` tells the store nothing changed, so readers can
    /// detect changes with [`Rc::ptr_eq`]. The default always allocates a new
    /// state from [`reduce`](Self::reduce).
    fn reduce_shared(&self, state: Option<&Rc<S>>, action: &Action) -> Result<Option<Rc<S>>> {
        Ok(self.reduce(state.map(|state| &**state), action)?.map(Rc::new))
    }
}

impl<S, F> Reducer<S> for F
where
    F: Fn(Option<&S>, &Action) -> Result<Option<S>>,
{
    fn reduce(&self, state: Option<&S>, action: &Action) -> Result<Option<S>> {
        self(state, action)
    }
}

/// A shared, type-erased reducer as held by stores and combinators.
pub type BoxedReducer<S> = Rc<dyn Reducer<S>>;

/// Erase a reducer's concrete type.
pub fn boxed<S, R>(reducer: R) -> BoxedReducer<S>
where
    R: Reducer<S> + 'static,
{
    Rc::new(reducer)
}
