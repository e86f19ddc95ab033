//! Combining reducers over a keyed JSON state

use reducto::{boxed, combine_reducers, Action, Result, Store};
use serde_json::{json, Value};

fn counter(state: Option<&Value>, action: &Action) -> Result<Option<Value>> {
    let count = state.and_then(Value::as_i64).unwrap_or(0);
    Ok(Some(json!(match action.action_type() {
        "INCREMENT" => count + 1,
        "DECREMENT" => count - 1,
        _ => count,
    })))
}

fn messages(state: Option<&Value>, action: &Action) -> Result<Option<Value>> {
    let mut messages = state.cloned().unwrap_or_else(|| json!([]));
    if action.is("POST") {
        if let (Some(list), Some(text)) = (messages.as_array_mut(), action.get("text")) {
            list.push(text.clone());
        }
    }
    Ok(Some(messages))
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Combined Reducers Example ===\n");

    let root = combine_reducers([("counter", boxed(counter)), ("messages", boxed(messages))]);
    println!("1. Keys: {:?}", root.keys().collect::<Vec<_>>());

    let store = Store::with_state(root, json!({"counter": 10, "stale": true}))?;
    println!("   Initial state: {}", store.get_state());

    println!("\n2. Dispatching actions");
    store.dispatch(Action::new("INCREMENT"))?;
    store.dispatch(Action::new("POST").with("text", "hello"))?;
    store.dispatch_value(json!({"type": "POST", "text": "world"}))?;
    println!("   State: {}", store.get_state());

    println!("\n3. Dispatching a malformed action");
    match store.dispatch_value(json!({"text": "no type"})) {
        Ok(_) => println!("   unexpectedly accepted"),
        Err(err) => println!("   rejected: {}", err),
    }

    println!("\n✓ Example complete!");
    Ok(())
}
