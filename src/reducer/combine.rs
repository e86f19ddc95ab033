use super::reducer::{BoxedReducer, Reducer};
use crate::action::{json_kind, probe_type, Action, INIT};
use crate::error::{ReducerContractError, Result, StoreError};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// A reducer over a keyed JSON state, delegating each key to its own reducer.
///
/// Built by [`combine_reducers`]. Each instance owns its probe action type, the
/// outcome of the sanity check performed at construction, and the set of
/// unexpected state keys it has already warned about.
pub struct CombinedReducer {
    reducers: IndexMap<String, BoxedReducer<Value>>,
    probe_type: String,
    sanity_error: Option<StoreError>,
    unexpected_key_cache: RefCell<HashSet<String>>,
}

/// Turn a map of reducers into a single reducer over a JSON object whose keys
/// match the map's keys.
///
/// Every reducer is checked up front: given no state, it must return something
/// for both the INIT action and a randomly typed probe action. If any check
/// fails, the combined reducer fails with that same error on every call.
///
/// ```
/// use reducto::{boxed, combine_reducers, Action, Reducer, Result};
/// use serde_json::{json, Value};
///
/// fn counter(state: Option<&Value>, action: &Action) -> Result<Option<Value>> {
///     let count = state.and_then(Value::as_i64).unwrap_or(0);
///     Ok(Some(json!(if action.is("INCREMENT") { count + 1 } else { count })))
/// }
///
/// let root = combine_reducers([("counter", boxed(counter))]);
/// let state = root.reduce(None, &Action::new("INCREMENT")).unwrap();
/// assert_eq!(state, Some(json!({"counter": 1})));
/// ```
pub fn combine_reducers<I, K>(reducers: I) -> CombinedReducer
where
    I: IntoIterator<Item = (K, BoxedReducer<Value>)>,
    K: Into<String>,
{
    CombinedReducer::new(
        reducers
            .into_iter()
            .map(|(key, reducer)| (key.into(), reducer))
            .collect(),
    )
}

impl CombinedReducer {
    fn new(reducers: IndexMap<String, BoxedReducer<Value>>) -> Self {
        let probe_type = probe_type();
        let sanity_error = assert_reducer_sanity(&reducers, &probe_type).err();
        if let Some(err) = &sanity_error {
            log::debug!("combine_reducers: sanity check failed: {}", err);
        }

        Self {
            reducers,
            probe_type,
            sanity_error,
            unexpected_key_cache: RefCell::new(HashSet::new()),
        }
    }

    /// Keys managed by this reducer, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.reducers.keys().map(String::as_str)
    }

    fn unexpected_state_shape_warning(&self, state: &Value, action: &Action) -> Option<String> {
        let argument_name = if action.is_init() {
            "preloaded state passed to create_store"
        } else {
            "previous state received by the reducer"
        };

        if self.reducers.is_empty() {
            return Some(
                "Store does not have a valid reducer. Make sure the argument passed to \
                 combine_reducers is a map whose values are reducers."
                    .to_string(),
            );
        }

        let expected_keys = self.reducers.keys().cloned().collect::<Vec<_>>().join("\", \"");

        let Some(record) = state.as_object() else {
            return Some(format!(
                "The {} has unexpected type of \"{}\". Expected argument to be an object with the \
                 following keys: \"{}\"",
                argument_name,
                json_kind(state),
                expected_keys
            ));
        };

        let mut cache = self.unexpected_key_cache.borrow_mut();
        let unexpected: Vec<&String> = record
            .keys()
            .filter(|key| !self.reducers.contains_key(key.as_str()) && !cache.contains(*key))
            .collect();
        for key in &unexpected {
            cache.insert((*key).clone());
        }

        if unexpected.is_empty() {
            return None;
        }

        let noun = if unexpected.len() > 1 { "keys" } else { "key" };
        let unexpected = unexpected
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<_>>()
            .join("\", \"");
        Some(format!(
            "Unexpected {} \"{}\" found in {}. Expected to find one of the known reducer keys \
             instead: \"{}\". Unexpected keys will be ignored.",
            noun,
            unexpected,
            argument_name,
            expected_keys
        ))
    }

    /// Run every key's reducer against `state`, which defaults to an empty
    /// object. Returns `None` when no key's value changed.
    fn reduce_keys(&self, state: Option<&Value>, action: &Action) -> Result<Option<Value>> {
        if let Some(err) = &self.sanity_error {
            return Err(err.clone());
        }

        let empty = Value::Object(Map::new());
        let state = state.unwrap_or(&empty);

        if let Some(message) = self.unexpected_state_shape_warning(state, action) {
            log::warn!("{}", message);
        }

        let previous = state.as_object();
        let mut has_changed = false;
        let mut next_state = Map::new();

        for (key, reducer) in &self.reducers {
            let previous_for_key = previous.and_then(|record| record.get(key));
            let next_for_key = match reducer.reduce(previous_for_key, action)? {
                Some(value) if !value.is_null() => value,
                _ => {
                    return Err(ReducerContractError::UndefinedState {
                        key: key.clone(),
                        action_type: action.action_type().to_string(),
                    }
                    .into())
                }
            };
            has_changed = has_changed || previous_for_key != Some(&next_for_key);
            next_state.insert(key.clone(), next_for_key);
        }

        Ok(has_changed.then_some(Value::Object(next_state)))
    }
}

impl Reducer<Value> for CombinedReducer {
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Result<Option<Value>> {
        match self.reduce_keys(state, action)? {
            Some(next) => Ok(Some(next)),
            None => Ok(Some(state.cloned().unwrap_or_else(|| Value::Object(Map::new())))),
        }
    }

    /// Hands back the very same `Rc` when no key's value changed.
    fn reduce_shared(
        &self,
        state: Option<&Rc<Value>>,
        action: &Action,
    ) -> Result<Option<Rc<Value>>> {
        let next = self.reduce_keys(state.map(|state| &**state), action)?;
        Ok(Some(match (next, state) {
            (Some(next), _) => Rc::new(next),
            (None, Some(state)) => Rc::clone(state),
            (None, None) => Rc::new(Value::Object(Map::new())),
        }))
    }
}

impl std::fmt::Debug for CombinedReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("keys", &self.reducers.keys().collect::<Vec<_>>())
            .field("probe_type", &self.probe_type)
            .field("sanity_error", &self.sanity_error)
            .finish()
    }
}

fn assert_reducer_sanity(
    reducers: &IndexMap<String, BoxedReducer<Value>>,
    probe_type: &str,
) -> Result<()> {
    for (key, reducer) in reducers {
        if is_undefined(reducer.reduce(None, &Action::init())?) {
            return Err(ReducerContractError::Init { key: key.clone() }.into());
        }

        if is_undefined(reducer.reduce(None, &Action::new(probe_type))?) {
            return Err(ReducerContractError::Probe {
                key: key.clone(),
                init: INIT.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

fn is_undefined(value: Option<Value>) -> bool {
    value.map_or(true, |value| value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::boxed;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter(state: Option<&Value>, action: &Action) -> Result<Option<Value>> {
        let count = state.and_then(Value::as_i64).unwrap_or(0);
        if action.is("increment") {
            Ok(Some(json!(count + 1)))
        } else {
            Ok(Some(json!(count)))
        }
    }

    fn stack(state: Option<&Value>, action: &Action) -> Result<Option<Value>> {
        let mut items = state.cloned().unwrap_or_else(|| json!([]));
        if action.is("push") {
            if let (Some(list), Some(value)) = (items.as_array_mut(), action.get("value")) {
                list.push(value.clone());
            }
        }
        Ok(Some(items))
    }

    #[test]
    fn returns_a_composite_reducer_that_maps_the_state_keys_to_given_reducers() {
        let reducer = combine_reducers([("counter", boxed(counter)), ("stack", boxed(stack))]);

        let s1 = reducer.reduce(None, &Action::new("increment")).unwrap().unwrap();
        assert_eq!(s1, json!({"counter": 1, "stack": []}));

        let s2 = reducer
            .reduce(Some(&s1), &Action::new("push").with("value", "a"))
            .unwrap()
            .unwrap();
        assert_eq!(s2, json!({"counter": 1, "stack": ["a"]}));
    }

    #[test]
    fn keeps_registration_order() {
        let reducer = combine_reducers([("stack", boxed(stack)), ("counter", boxed(counter))]);
        assert_eq!(reducer.keys().collect::<Vec<_>>(), vec!["stack", "counter"]);
    }

    #[test]
    fn returns_the_original_state_when_nothing_changed() {
        let reducer = combine_reducers([("counter", boxed(counter)), ("stack", boxed(stack))]);
        let initial = reducer.reduce(None, &Action::new("@@init")).unwrap().unwrap();

        let unknown = reducer.reduce(Some(&initial), &Action::new("unknown")).unwrap();
        assert_eq!(unknown, Some(initial.clone()));

        let changed = reducer.reduce(Some(&initial), &Action::new("increment")).unwrap();
        assert_ne!(changed, Some(initial));
    }

    #[test]
    fn shares_the_original_state_when_nothing_changed() {
        let reducer = combine_reducers([("counter", boxed(counter)), ("stack", boxed(stack))]);
        let initial = reducer.reduce_shared(None, &Action::init()).unwrap().unwrap();

        let unknown = reducer
            .reduce_shared(Some(&initial), &Action::new("unknown"))
            .unwrap()
            .unwrap();
        assert!(Rc::ptr_eq(&initial, &unknown));

        let changed = reducer
            .reduce_shared(Some(&initial), &Action::new("increment"))
            .unwrap()
            .unwrap();
        assert!(!Rc::ptr_eq(&initial, &changed));
        assert_eq!(*changed, json!({"counter": 1, "stack": []}));
    }

    #[test]
    fn throws_if_a_reducer_returns_undefined_handling_an_action() {
        let picky = |state: Option<&Value>, action: &Action| -> Result<Option<Value>> {
            if action.is("whatever") {
                return Ok(None);
            }
            Ok(Some(state.cloned().unwrap_or_else(|| json!(0))))
        };
        let reducer = combine_reducers([("counter", boxed(picky))]);
        let state = json!({"counter": 0});

        let err = reducer.reduce(Some(&state), &Action::new("whatever")).unwrap_err();
        assert_eq!(
            err,
            StoreError::ReducerContract(ReducerContractError::UndefinedState {
                key: "counter".into(),
                action_type: "whatever".into(),
            })
        );
        assert!(err.to_string().contains("\"whatever\""));
        assert!(err.to_string().contains("\"counter\""));
    }

    #[test]
    fn null_values_count_as_undefined() {
        let nulling = |state: Option<&Value>, action: &Action| -> Result<Option<Value>> {
            if action.is("clear") {
                return Ok(Some(Value::Null));
            }
            Ok(Some(state.cloned().unwrap_or_else(|| json!(0))))
        };
        let reducer = combine_reducers([("counter", boxed(nulling))]);
        let err = reducer.reduce(None, &Action::new("clear")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::ReducerContract(ReducerContractError::UndefinedState { .. })
        ));
    }

    #[test]
    fn fails_sticky_when_a_reducer_returns_undefined_during_init() {
        let broken = |state: Option<&Value>, _action: &Action| -> Result<Option<Value>> {
            Ok(state.cloned())
        };
        let reducer = combine_reducers([("counter", boxed(counter)), ("broken", boxed(broken))]);
        let expected = StoreError::ReducerContract(ReducerContractError::Init {
            key: "broken".into(),
        });

        assert_eq!(reducer.reduce(None, &Action::new("increment")), Err(expected.clone()));
        assert_eq!(
            reducer.reduce(Some(&json!({})), &Action::new("increment")),
            Err(expected)
        );
    }

    #[test]
    fn fails_sticky_when_a_reducer_mishandles_the_probe() {
        let sneaky = |state: Option<&Value>, action: &Action| -> Result<Option<Value>> {
            if action.is(INIT) {
                return Ok(Some(json!(0)));
            }
            Ok(state.cloned())
        };
        let reducer = combine_reducers([("sneaky", boxed(sneaky))]);

        for _ in 0..2 {
            let err = reducer.reduce(None, &Action::new("anything")).unwrap_err();
            assert!(matches!(
                err,
                StoreError::ReducerContract(ReducerContractError::Probe { ref key, .. })
                    if key == "sneaky"
            ));
        }
    }

    #[test]
    fn probes_with_a_reserved_type_unique_to_the_instance() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = {
            let seen = seen.clone();
            move |state: Option<&Value>, action: &Action| -> Result<Option<Value>> {
                seen.borrow_mut().push(action.clone());
                Ok(Some(state.cloned().unwrap_or_else(|| json!(0))))
            }
        };

        let shared = boxed(recorder);
        let _a = combine_reducers([("a", shared.clone())]);
        let _b = combine_reducers([("b", shared)]);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(Action::is_reserved));
        assert_ne!(seen[1], seen[3]);
    }

    #[test]
    fn ignores_unexpected_keys_but_warns_once_per_key() {
        let reducer = combine_reducers([("counter", boxed(counter))]);
        let state = json!({"counter": 0, "extra": true});

        assert!(reducer
            .unexpected_state_shape_warning(&state, &Action::new("x"))
            .unwrap()
            .contains("Unexpected key \"extra\""));
        assert!(reducer
            .unexpected_state_shape_warning(&state, &Action::new("x"))
            .is_none());

        let next = reducer.reduce(Some(&state), &Action::new("increment")).unwrap();
        assert_eq!(next, Some(json!({"counter": 1})));

        let unchanged = reducer.reduce(Some(&state), &Action::new("unknown")).unwrap();
        assert_eq!(unchanged, Some(json!({"counter": 0, "extra": true})));
    }

    #[test]
    fn warns_when_state_is_not_an_object() {
        let reducer = combine_reducers([("counter", boxed(counter))]);
        let message = reducer
            .unexpected_state_shape_warning(&json!(42), &Action::init())
            .unwrap();
        assert!(message.contains("preloaded state"));
        assert!(message.contains("\"number\""));

        let next = reducer.reduce(Some(&json!(42)), &Action::new("x")).unwrap();
        assert_eq!(next, Some(json!({"counter": 0})));
    }

    #[test]
    fn warns_when_no_reducers_were_given() {
        let reducer = combine_reducers(Vec::<(String, BoxedReducer<Value>)>::new());
        assert!(reducer
            .unexpected_state_shape_warning(&json!({}), &Action::new("x"))
            .unwrap()
            .contains("does not have a valid reducer"));
        assert_eq!(reducer.reduce(None, &Action::new("x")), Ok(Some(json!({}))));
    }

    #[test]
    fn propagates_reducer_errors() {
        let calls = Rc::new(Cell::new(0));
        let failing = {
            let calls = calls.clone();
            move |state: Option<&Value>, action: &Action| -> Result<Option<Value>> {
                calls.set(calls.get() + 1);
                if action.is("boom") {
                    return Err(StoreError::reducer("boom"));
                }
                Ok(Some(state.cloned().unwrap_or_else(|| json!(0))))
            }
        };
        let reducer = combine_reducers([("failing", boxed(failing))]);
        assert_eq!(
            reducer.reduce(None, &Action::new("boom")),
            Err(StoreError::Reducer("boom".into()))
        );
        assert_eq!(calls.get(), 3);
    }
}
