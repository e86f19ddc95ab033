use super::enhancer::{base_factory, Enhancer};
use super::listeners::{ListenerRegistry, Subscription};
use crate::action::Action;
use crate::error::{ReducerContractError, Result, StoreError};
use crate::reducer::{boxed, BoxedReducer, Reducer};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// A dispatch function: applies an action and hands it back.
pub type Dispatch = Rc<dyn Fn(Action) -> Result<Action>>;

/// Key reported when the root reducer of a store returns nothing.
const ROOT_KEY: &str = "<root>";

/// A single-threaded state container updated only through its reducer.
///
/// `Store` is a cheap handle: clones share the same state, reducer and
/// listeners, so a clone can be moved into a listener that dispatches again.
///
/// # Examples
///
/// ```
/// use reducto::{Action, Result, Store};
///
/// fn counter(state: Option<&i64>, action: &Action) -> Result<Option<i64>> {
///     let count = state.copied().unwrap_or(0);
///     Ok(Some(if action.is("INCREMENT") { count + 1 } else { count }))
/// }
///
/// let store = Store::new(counter).unwrap();
/// assert_eq!(*store.get_state(), 0);
///
/// store.dispatch(Action::new("INCREMENT")).unwrap();
/// assert_eq!(*store.get_state(), 1);
/// ```
pub struct Store<S> {
    inner: Rc<StoreInner<S>>,
}

struct StoreInner<S> {
    reducer: RefCell<BoxedReducer<S>>,
    state: Rc<RefCell<Rc<S>>>,
    listeners: Rc<RefCell<ListenerRegistry>>,
    is_dispatching: Cell<bool>,
    installed_dispatch: RefCell<Option<Dispatch>>,
}

/// Build a store, optionally routing construction through an enhancer.
///
/// Without an enhancer the store is created directly and primed with the
/// reserved INIT action. With one, the result is whatever the enhanced factory
/// returns for `reducer` and `preloaded_state`.
pub fn create_store<S, R>(
    reducer: R,
    preloaded_state: Option<S>,
    enhancer: Option<&dyn Enhancer<S>>,
) -> Result<Store<S>>
where
    S: 'static,
    R: Reducer<S> + 'static,
{
    let reducer = boxed(reducer);
    match enhancer {
        Some(enhancer) => enhancer.enhance(base_factory())(reducer, preloaded_state),
        None => Store::from_boxed(reducer, preloaded_state),
    }
}

impl<S: 'static> Store<S> {
    /// Create a store whose initial state comes from the reducer itself.
    pub fn new<R>(reducer: R) -> Result<Self>
    where
        R: Reducer<S> + 'static,
    {
        Self::from_boxed(boxed(reducer), None)
    }

    /// Create a store starting from `state`, which the reducer sees with INIT.
    pub fn with_state<R>(reducer: R, state: S) -> Result<Self>
    where
        R: Reducer<S> + 'static,
    {
        Self::from_boxed(boxed(reducer), Some(state))
    }

    pub(crate) fn from_boxed(reducer: BoxedReducer<S>, preloaded_state: Option<S>) -> Result<Self> {
        let init = Action::init();
        let preloaded_state = preloaded_state.map(Rc::new);
        let state = reducer
            .reduce_shared(preloaded_state.as_ref(), &init)?
            .ok_or_else(|| undefined_root(&init))?;

        log::debug!("store created");

        Ok(Self {
            inner: Rc::new(StoreInner {
                reducer: RefCell::new(reducer),
                state: Rc::new(RefCell::new(state)),
                listeners: Rc::new(RefCell::new(ListenerRegistry::new())),
                is_dispatching: Cell::new(false),
                installed_dispatch: RefCell::new(None),
            }),
        })
    }

    /// The current state. No copy is made; the state is shared with the store.
    pub fn get_state(&self) -> Rc<S> {
        Rc::clone(&*self.inner.state.borrow())
    }

    /// Register a listener to be called after every dispatch.
    ///
    /// A listener added while a dispatch is notifying listeners is first called
    /// on the next dispatch.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        let id = self.inner.listeners.borrow_mut().add(Rc::new(listener));
        Subscription::new(id, &self.inner.listeners)
    }

    /// Number of listeners that the next dispatch will notify.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Dispatch an action, the only way to change state.
    ///
    /// Goes through the installed middleware chain when there is one. Fails
    /// with [`StoreError::Reentrancy`] when called from inside a reducer.
    pub fn dispatch(&self, action: Action) -> Result<Action> {
        let installed = self.inner.installed_dispatch.borrow().clone();
        match installed {
            Some(dispatch) => dispatch(action),
            None => self.inner.dispatch_native(action),
        }
    }

    /// Dispatch an action given in its JSON record form.
    ///
    /// Fails with [`StoreError::MalformedAction`] before reaching the reducer if
    /// `value` is not an object or has no `type`.
    pub fn dispatch_value(&self, value: Value) -> Result<Action> {
        self.dispatch(Action::try_from(value)?)
    }

    /// Swap the reducer and re-prime the state with an INIT dispatch.
    pub fn replace_reducer<R>(&self, next_reducer: R) -> Result<()>
    where
        R: Reducer<S> + 'static,
    {
        if self.inner.is_dispatching.get() {
            return Err(StoreError::Reentrancy);
        }

        *self.inner.reducer.borrow_mut() = boxed(next_reducer);
        log::debug!("reducer replaced");

        self.dispatch(Action::init()).map(|_| ())
    }

    /// A dispatch function bound to this store.
    pub fn dispatcher(&self) -> Dispatch {
        let store = self.clone();
        Rc::new(move |action: Action| store.dispatch(action))
    }

    /// The store's own dispatch, bypassing any installed middleware.
    pub(crate) fn native_dispatch(&self) -> Dispatch {
        let inner = Rc::downgrade(&self.inner);
        Rc::new(move |action: Action| match inner.upgrade() {
            Some(inner) => inner.dispatch_native(action),
            None => Err(StoreError::configuration("store has been dropped")),
        })
    }

    pub(crate) fn install_dispatch(&self, dispatch: Dispatch) {
        *self.inner.installed_dispatch.borrow_mut() = Some(dispatch);
    }

    pub(crate) fn has_installed_dispatch(&self) -> bool {
        self.inner.installed_dispatch.borrow().is_some()
    }

    pub(crate) fn state_cell(&self) -> Rc<RefCell<Rc<S>>> {
        Rc::clone(&self.inner.state)
    }

    pub(crate) fn downgrade(&self) -> WeakStore<S> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<S> StoreInner<S> {
    fn dispatch_native(&self, action: Action) -> Result<Action> {
        if self.is_dispatching.get() {
            log::debug!("rejected {} dispatched from inside a reducer", action);
            return Err(StoreError::Reentrancy);
        }

        log::trace!("dispatching {}", action);

        let reducer = Rc::clone(&*self.reducer.borrow());
        let previous = Rc::clone(&*self.state.borrow());
        let next = {
            let _guard = DispatchGuard::enter(&self.is_dispatching);
            reducer.reduce_shared(Some(&previous), &action)?
        };
        let next = next.ok_or_else(|| undefined_root(&action))?;
        *self.state.borrow_mut() = next;

        let listeners = self.listeners.borrow_mut().snapshot();
        for listener in listeners.iter() {
            listener.notify();
        }

        Ok(action)
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// A non-owning reference to a store, held by middleware.
pub(crate) struct WeakStore<S> {
    inner: Weak<StoreInner<S>>,
}

impl<S> WeakStore<S> {
    pub(crate) fn upgrade(&self) -> Option<Store<S>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<S> Clone for WeakStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

/// Marks a dispatch in progress; the flag is cleared however the scope exits.
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

fn undefined_root(action: &Action) -> StoreError {
    ReducerContractError::UndefinedState {
        key: ROOT_KEY.to_string(),
        action_type: action.action_type().to_string(),
    }
    .into()
}
