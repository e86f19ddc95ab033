use super::store::Store;
use crate::error::Result;
use crate::reducer::BoxedReducer;
use std::rc::Rc;

/// Something that builds a store from a reducer and optional preloaded state.
pub type StoreFactory<S> = Rc<dyn Fn(BoxedReducer<S>, Option<S>) -> Result<Store<S>>>;

/// A transformation of the store factory, used to install cross-cutting behavior.
///
/// [`apply_middleware`](crate::apply_middleware) is the enhancer shipped with
/// this crate. Any `Fn(StoreFactory<S>) -> StoreFactory<S>` is also an enhancer.
pub trait Enhancer<S> {
    fn enhance(&self, create_store: StoreFactory<S>) -> StoreFactory<S>;
}

impl<S, F> Enhancer<S> for F
where
    F: Fn(StoreFactory<S>) -> StoreFactory<S>,
{
    fn enhance(&self, create_store: StoreFactory<S>) -> StoreFactory<S> {
        self(create_store)
    }
}

/// The factory that builds a plain store without any enhancer.
pub(crate) fn base_factory<S: 'static>() -> StoreFactory<S> {
    Rc::new(|reducer: BoxedReducer<S>, preloaded_state: Option<S>| {
        Store::from_boxed(reducer, preloaded_state)
    })
}
