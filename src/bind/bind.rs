use crate::action::Action;
use crate::error::{Result, StoreError};
use crate::store::Dispatch;
use indexmap::IndexMap;
use serde_json::Value;
use std::rc::Rc;

/// Builds an action from its arguments.
pub type ActionCreator = Rc<dyn Fn(Value) -> Action>;

/// An action creator that dispatches what it creates.
pub type BoundActionCreator = Rc<dyn Fn(Value) -> Result<Action>>;

/// What [`bind_action_creators`] accepts: one creator, or named creators.
pub enum ActionCreators {
    Single(ActionCreator),
    Map(Vec<(String, ActionCreator)>),
}

/// The result of [`bind_action_creators`], shaped like its input.
pub enum BoundActionCreators {
    Single(BoundActionCreator),
    Map(IndexMap<String, BoundActionCreator>),
}

impl BoundActionCreators {
    /// The bound creator registered under `key`, for the map form.
    pub fn get(&self, key: &str) -> Option<&BoundActionCreator> {
        match self {
            Self::Single(_) => None,
            Self::Map(creators) => creators.get(key),
        }
    }

    /// The bound creator, for the single form.
    pub fn single(&self) -> Option<&BoundActionCreator> {
        match self {
            Self::Single(creator) => Some(creator),
            Self::Map(_) => None,
        }
    }
}

/// Wrap `action_creator` so that calling it dispatches the created action.
pub fn bind_action_creator(
    action_creator: ActionCreator,
    dispatch: Dispatch,
) -> BoundActionCreator {
    Rc::new(move |args: Value| dispatch(action_creator(args)))
}

/// Bind one action creator, or every creator of a map, to `dispatch`.
///
/// Fails with [`StoreError::Bind`] if the map names the same key twice.
///
/// ```
/// use reducto::bind::{bind_action_creators, ActionCreator, ActionCreators};
/// use reducto::{Action, Result, Store};
/// use serde_json::{json, Value};
/// use std::rc::Rc;
///
/// fn texts(state: Option<&Vec<String>>, action: &Action) -> Result<Option<Vec<String>>> {
///     let mut texts = state.cloned().unwrap_or_default();
///     if let Some(text) = action.get_str("text") {
///         texts.push(text.to_string());
///     }
///     Ok(Some(texts))
/// }
///
/// let store = Store::new(texts).unwrap();
/// let add: ActionCreator = Rc::new(|text: Value| Action::new("ADD").with("text", text));
/// let bound = bind_action_creators(
///     ActionCreators::Map(vec![("add".to_string(), add)]),
///     store.dispatcher(),
/// )
/// .unwrap();
///
/// (bound.get("add").unwrap())(json!("Hello")).unwrap();
/// assert_eq!(*store.get_state(), vec!["Hello".to_string()]);
/// ```
pub fn bind_action_creators(
    action_creators: ActionCreators,
    dispatch: Dispatch,
) -> Result<BoundActionCreators> {
    match action_creators {
        ActionCreators::Single(creator) => Ok(BoundActionCreators::Single(bind_action_creator(
            creator, dispatch,
        ))),
        ActionCreators::Map(creators) => {
            let mut bound = IndexMap::with_capacity(creators.len());
            for (key, creator) in creators {
                if bound.contains_key(&key) {
                    return Err(StoreError::Bind(format!(
                        "bind_action_creators received the key \"{}\" more than once",
                        key
                    )));
                }
                let creator = bind_action_creator(creator, Rc::clone(&dispatch));
                bound.insert(key, creator);
            }
            Ok(BoundActionCreators::Map(bound))
        }
    }
}
