use crate::action::Action;
use crate::compose::{compose, Func};
use crate::error::{Result, StoreError};
use crate::reducer::BoxedReducer;
use crate::store::{Dispatch, Enhancer, Store, StoreFactory, WeakStore};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One layer of the dispatch chain: given the next dispatch, returns a new one.
pub type DispatchLayer = Func<Dispatch>;

/// A shared, type-erased middleware.
pub type BoxedMiddleware<S> = Rc<dyn Middleware<S>>;

/// Middleware trait - intercepts actions on their way to the reducer
///
/// Middleware is set up once per store. Setup receives the [`MiddlewareApi`]
/// and returns the [`DispatchLayer`] that wraps the rest of the chain. A layer
/// can:
/// - Inspect the action and the current state
/// - Dispatch other actions through the full chain
/// - Transform the action before passing it on
/// - Swallow the action by not calling `next`
///
/// Any `Fn(&MiddlewareApi<S>) -> DispatchLayer` is a middleware:
///
/// ```
/// use reducto::middleware::{DispatchLayer, MiddlewareApi};
/// use reducto::{Action, Dispatch};
/// use std::rc::Rc;
///
/// fn stamp(_api: &MiddlewareApi<i64>) -> DispatchLayer {
///     Rc::new(|next: Dispatch| -> Dispatch {
///         Rc::new(move |action: Action| next(action.with("stamped", true)))
///     })
/// }
/// ```
pub trait Middleware<S> {
    fn setup(&self, api: &MiddlewareApi<S>) -> DispatchLayer;
}

impl<S, F> Middleware<S> for F
where
    F: Fn(&MiddlewareApi<S>) -> DispatchLayer,
{
    fn setup(&self, api: &MiddlewareApi<S>) -> DispatchLayer {
        self(api)
    }
}

/// The view of the store handed to middleware.
///
/// `dispatch` always goes through the complete middleware chain, including the
/// middleware calling it. It is rejected while the chain is still being built.
pub struct MiddlewareApi<S> {
    state: Rc<RefCell<Rc<S>>>,
    store: WeakStore<S>,
    ready: Rc<Cell<bool>>,
}

impl<S: 'static> MiddlewareApi<S> {
    fn new(store: &Store<S>) -> Self {
        Self {
            state: store.state_cell(),
            store: store.downgrade(),
            ready: Rc::new(Cell::new(false)),
        }
    }

    /// The store's current state.
    pub fn get_state(&self) -> Rc<S> {
        Rc::clone(&*self.state.borrow())
    }

    /// Dispatch through the whole middleware chain.
    pub fn dispatch(&self, action: Action) -> Result<Action> {
        if !self.ready.get() {
            return Err(StoreError::configuration(
                "Dispatching while constructing your middleware is not allowed. Other middleware \
                 would not be applied to this dispatch.",
            ));
        }

        match self.store.upgrade() {
            Some(store) => store.dispatch(action),
            None => Err(StoreError::configuration("store has been dropped")),
        }
    }

    /// A dispatch function forwarding to [`dispatch`](Self::dispatch).
    pub fn dispatcher(&self) -> Dispatch {
        let api = self.clone();
        Rc::new(move |action: Action| api.dispatch(action))
    }
}

impl<S> Clone for MiddlewareApi<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            store: self.store.clone(),
            ready: Rc::clone(&self.ready),
        }
    }
}

/// Enhancer that installs a chain of middleware around a store's dispatch.
///
/// Built by [`apply_middleware`]. Middleware listed first sees each action first.
pub struct ApplyMiddleware<S> {
    middlewares: Rc<Vec<BoxedMiddleware<S>>>,
}

/// Create an enhancer that applies `middlewares` to the dispatch of the store it
/// builds.
///
/// ```
/// use reducto::{apply_middleware, create_store, Action, Result};
/// use reducto::middleware::{BoxedMiddleware, LoggerMiddleware};
/// use std::rc::Rc;
///
/// fn counter(state: Option<&i64>, action: &Action) -> Result<Option<i64>> {
///     let count = state.copied().unwrap_or(0);
///     Ok(Some(if action.is("INCREMENT") { count + 1 } else { count }))
/// }
///
/// let enhancer = apply_middleware([Rc::new(LoggerMiddleware::new()) as BoxedMiddleware<i64>]);
/// let store = create_store(counter, None, Some(&enhancer)).unwrap();
/// store.dispatch(Action::new("INCREMENT")).unwrap();
/// assert_eq!(*store.get_state(), 1);
/// ```
pub fn apply_middleware<S, I>(middlewares: I) -> ApplyMiddleware<S>
where
    I: IntoIterator<Item = BoxedMiddleware<S>>,
{
    ApplyMiddleware {
        middlewares: Rc::new(middlewares.into_iter().collect()),
    }
}

impl<S> ApplyMiddleware<S> {
    /// An enhancer with no middleware yet.
    pub fn new() -> Self {
        Self {
            middlewares: Rc::new(Vec::new()),
        }
    }

    /// Append a middleware to the chain.
    pub fn with<M>(self, middleware: M) -> Self
    where
        M: Middleware<S> + 'static,
    {
        let mut middlewares = self.middlewares.as_ref().clone();
        middlewares.push(Rc::new(middleware));
        Self {
            middlewares: Rc::new(middlewares),
        }
    }

    /// Number of middleware in the chain.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl<S> Default for ApplyMiddleware<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Enhancer<S> for ApplyMiddleware<S> {
    fn enhance(&self, create_store: StoreFactory<S>) -> StoreFactory<S> {
        let middlewares = Rc::clone(&self.middlewares);
        Rc::new(move |reducer: BoxedReducer<S>, preloaded_state: Option<S>| -> Result<Store<S>> {
            let store = create_store(reducer, preloaded_state)?;
            if store.has_installed_dispatch() {
                return Err(StoreError::configuration(
                    "middleware is already installed on this store; wrapping one middleware \
                     enhancer in another is not supported",
                ));
            }

            let api = MiddlewareApi::new(&store);
            let chain: Vec<DispatchLayer> = middlewares.iter().map(|m| m.setup(&api)).collect();
            let dispatch = compose(chain)(store.native_dispatch());
            store.install_dispatch(dispatch);
            api.ready.set(true);

            log::debug!("installed {} middleware", middlewares.len());
            Ok(store)
        })
    }
}
