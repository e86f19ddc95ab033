//! Demonstration of a Store managing a todo list

use reducto::{Action, Result, Store};

#[derive(Clone, Debug)]
struct TodoItem {
    id: usize,
    title: String,
    completed: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum TodoFilter {
    All,
    Active,
    Completed,
}

#[derive(Clone, Debug)]
struct AppState {
    todos: Vec<TodoItem>,
    filter: TodoFilter,
}

impl AppState {
    fn new() -> Self {
        Self {
            todos: Vec::new(),
            filter: TodoFilter::All,
        }
    }

    fn filtered_todos(&self) -> Vec<&TodoItem> {
        match self.filter {
            TodoFilter::All => self.todos.iter().collect(),
            TodoFilter::Active => self.todos.iter().filter(|t| !t.completed).collect(),
            TodoFilter::Completed => self.todos.iter().filter(|t| t.completed).collect(),
        }
    }

    fn stats(&self) -> (usize, usize, usize) {
        let total = self.todos.len();
        let completed = self.todos.iter().filter(|t| t.completed).count();
        let active = total - completed;
        (total, active, completed)
    }
}

fn app(state: Option<&AppState>, action: &Action) -> Result<Option<AppState>> {
    let mut state = state.cloned().unwrap_or_else(AppState::new);

    match action.action_type() {
        "ADD_TODO" => {
            let id = state.todos.len();
            let title = action.get_str("title").unwrap_or_default().to_string();
            state.todos.push(TodoItem {
                id,
                title,
                completed: false,
            });
        }
        "TOGGLE_TODO" => {
            let id = action.get("id").and_then(|id| id.as_u64()).map(|id| id as usize);
            if let Some(todo) = state.todos.iter_mut().find(|t| Some(t.id) == id) {
                todo.completed = !todo.completed;
            }
        }
        "SET_FILTER" => {
            state.filter = match action.get_str("filter") {
                Some("active") => TodoFilter::Active,
                Some("completed") => TodoFilter::Completed,
                _ => TodoFilter::All,
            };
        }
        _ => {}
    }

    Ok(Some(state))
}

fn print_todos(store: &Store<AppState>) {
    for todo in store.get_state().filtered_todos() {
        let status = if todo.completed { "✓" } else { " " };
        println!("   [{}] {}", status, todo.title);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Store Example: Todo App ===\n");

    let store = Store::new(app)?;

    println!("1. Setting up listener");
    let _subscription = store.subscribe({
        let store = store.clone();
        move || {
            let (total, active, completed) = store.get_state().stats();
            println!(
                "   [Store Update] Total: {}, Active: {}, Completed: {}",
                total, active, completed
            );
        }
    });

    println!("\n2. Adding todos");
    for title in ["Learn Rust", "Build a state container", "Write documentation"] {
        store.dispatch(Action::new("ADD_TODO").with("title", title))?;
    }

    println!("\n3. Current todos:");
    print_todos(&store);

    println!("\n4. Completing the first two todos");
    store.dispatch(Action::new("TOGGLE_TODO").with("id", 0))?;
    store.dispatch(Action::new("TOGGLE_TODO").with("id", 1))?;

    println!("\n5. Filtering to show only active todos");
    store.dispatch(Action::new("SET_FILTER").with("filter", "active"))?;
    print_todos(&store);

    println!("\n6. Filtering to show completed todos");
    store.dispatch(Action::new("SET_FILTER").with("filter", "completed"))?;
    print_todos(&store);

    let (total, active, completed) = store.get_state().stats();
    println!("\n7. Final statistics:");
    println!("   Total: {}", total);
    println!("   Active: {}", active);
    println!("   Completed: {}", completed);

    println!("\n✓ Example complete!");
    Ok(())
}
