use super::middleware::{DispatchLayer, Middleware, MiddlewareApi};
use crate::action::Action;
use crate::store::Dispatch;
use std::fmt::Debug;
use std::rc::Rc;

/// LoggerMiddleware - logs every action passing through the store
///
/// Logs the action type before it reaches the reducer and the resulting state
/// afterwards. Failed dispatches are logged at `warn` level regardless of the
/// configured level.
#[derive(Debug, Clone, Copy)]
pub struct LoggerMiddleware {
    level: log::Level,
}

impl LoggerMiddleware {
    /// Create a logger at `debug` level.
    pub fn new() -> Self {
        Self {
            level: log::Level::Debug,
        }
    }

    /// Log at `level` instead of `debug`.
    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }

    /// The level actions and states are logged at.
    pub fn level(&self) -> log::Level {
        self.level
    }
}

impl Default for LoggerMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Debug + 'static> Middleware<S> for LoggerMiddleware {
    fn setup(&self, api: &MiddlewareApi<S>) -> DispatchLayer {
        let level = self.level;
        let api = api.clone();
        Rc::new(move |next: Dispatch| -> Dispatch {
            let api = api.clone();
            Rc::new(move |action: Action| {
                let action_type = action.action_type().to_string();
                log::log!(level, "action {}", action_type);

                let result = next(action);
                match &result {
                    Ok(_) => {
                        log::log!(level, "next state after {}: {:?}", action_type, api.get_state())
                    }
                    Err(err) => log::warn!("action {} failed: {}", action_type, err),
                }
                result
            })
        })
    }
}
