//! Middleware and bound action creators
//!
//! Run with `RUST_LOG=debug` to see the logger middleware output.

use reducto::bind::ActionCreator;
use reducto::middleware::DispatchLayer;
use reducto::{
    bind_action_creators, create_store, Action, ActionCreators, ApplyMiddleware, Dispatch,
    LoggerMiddleware, MiddlewareApi, Result,
};
use serde_json::{json, Value};
use std::rc::Rc;

fn counter(state: Option<&i64>, action: &Action) -> Result<Option<i64>> {
    let count = state.copied().unwrap_or(0);
    let by = action.get("by").and_then(Value::as_i64).unwrap_or(1);
    Ok(Some(match action.action_type() {
        "INCREMENT" => count + by,
        "DECREMENT" => count - by,
        _ => count,
    }))
}

/// Turns every DOUBLE action into an INCREMENT by the current count.
fn doubler(api: &MiddlewareApi<i64>) -> DispatchLayer {
    let api = api.clone();
    Rc::new(move |next: Dispatch| -> Dispatch {
        let api = api.clone();
        Rc::new(move |action: Action| {
            if action.is("DOUBLE") {
                let count = *api.get_state();
                return next(Action::new("INCREMENT").with("by", count));
            }
            next(action)
        })
    })
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Middleware Example ===\n");

    let enhancer = ApplyMiddleware::new()
        .with(LoggerMiddleware::with_level(log::Level::Info))
        .with(doubler);
    let store = create_store(counter, Some(1), Some(&enhancer))?;

    let increment: ActionCreator = Rc::new(|by: Value| Action::new("INCREMENT").with("by", by));
    let double: ActionCreator = Rc::new(|_: Value| Action::new("DOUBLE"));
    let actions = bind_action_creators(
        ActionCreators::Map(vec![
            ("increment".to_string(), increment),
            ("double".to_string(), double),
        ]),
        store.dispatcher(),
    )?;

    println!("1. Incrementing by 2");
    if let Some(increment) = actions.get("increment") {
        increment(json!(2))?;
    }
    println!("   count = {}", store.get_state());

    println!("\n2. Doubling");
    if let Some(double) = actions.get("double") {
        double(Value::Null)?;
    }
    println!("   count = {}", store.get_state());

    println!("\n✓ Example complete!");
    Ok(())
}
