//! Todo list driven by one shared store
//!
//! Run with `RUST_LOG=stowage=debug cargo run --example todos` to see the
//! engine's own events.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;

use stowage::{Commit, Dispatcher, Handle, Keyed, Reducer, Registry, StoreOptions, Value};
use tracing_subscriber::EnvFilter;

const TODO_STORE: &str = "todos";

#[derive(Clone, Debug)]
struct Todo {
    content: String,
    completed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Filter {
    All,
    Completed,
    Incomplete,
}

impl Filter {
    fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Incomplete => "incomplete",
        }
    }
}

#[derive(Clone, Debug)]
struct TodoState {
    todos: Arc<BTreeMap<u32, Todo>>,
    filter: Filter,
}

impl Keyed for TodoState {
    fn value(&self, key: &str) -> Value {
        match key {
            "todos" => Value::from_arc(&self.todos),
            "filter" => self.filter.as_str().into(),
            _ => Value::Absent,
        }
    }
}

enum TodoAction {
    Add { id: u32, content: String },
    Toggle { id: u32 },
    SetFilter(Filter),
}

struct TodoReducer;

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Error = Infallible;

    fn reduce(&self, state: &TodoState, action: TodoAction) -> Result<TodoState, Infallible> {
        Ok(match action {
            TodoAction::Add { id, content } => {
                let mut todos = (*state.todos).clone();
                todos.insert(
                    id,
                    Todo {
                        content,
                        completed: false,
                    },
                );
                TodoState {
                    todos: Arc::new(todos),
                    ..state.clone()
                }
            }
            TodoAction::Toggle { id } => {
                let mut todos = (*state.todos).clone();
                match todos.get_mut(&id) {
                    Some(todo) => todo.completed = !todo.completed,
                    None => return Ok(state.clone()),
                }
                TodoState {
                    todos: Arc::new(todos),
                    ..state.clone()
                }
            }
            TodoAction::SetFilter(filter) => TodoState {
                filter,
                ..state.clone()
            },
        })
    }
}

/// Actions object the app shares with every component.
struct TodoActions {
    dispatch: Dispatcher<TodoReducer>,
    next_id: std::sync::atomic::AtomicU32,
}

impl TodoActions {
    fn add_todo(&self, content: &str) -> Commit {
        let id = self.next_id.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
        self.dispatch
            .dispatch(TodoAction::Add {
                id,
                content: content.to_string(),
            })
            .unwrap_or_else(|never| match never {})
    }

    fn toggle_todo(&self, id: u32) -> Commit {
        self.dispatch
            .dispatch(TodoAction::Toggle { id })
            .unwrap_or_else(|never| match never {})
    }

    fn set_filter(&self, filter: Filter) -> Commit {
        self.dispatch
            .dispatch(TodoAction::SetFilter(filter))
            .unwrap_or_else(|never| match never {})
    }
}

/// A stand-in for a host framework: renders components by consumer id.
struct App {
    root: Handle<TodoReducer>,
    list: Handle<TodoReducer>,
    filters: Handle<TodoReducer>,
}

impl App {
    fn mount(registry: &Registry) -> stowage::Result<Self> {
        let root = registry.create_or_attach(
            TODO_STORE,
            TodoReducer,
            TodoState {
                todos: Arc::new(BTreeMap::new()),
                filter: Filter::All,
            },
            StoreOptions::default(),
        )?;
        root.share_actions(Arc::new(TodoActions {
            dispatch: root.dispatcher(),
            next_id: Default::default(),
        }));

        let app = Self {
            list: registry.attach(TODO_STORE)?,
            filters: registry.attach(TODO_STORE)?,
            root,
        };
        app.render_root();
        app.render_list();
        app.render_filters();
        Ok(app)
    }

    fn render_root(&self) {
        println!("<TodoApp> Todo List ({})", self.root.state().todos.len());
    }

    fn render_list(&self) {
        self.list.watch(["todos", "filter"]);
        let state = self.list.state();
        let visible: Vec<_> = state
            .todos
            .iter()
            .filter(|(_, todo)| match state.filter {
                Filter::All => true,
                Filter::Completed => todo.completed,
                Filter::Incomplete => !todo.completed,
            })
            .map(|(id, todo)| {
                let mark = if todo.completed { "x" } else { " " };
                format!("[{mark}] {id}: {}", todo.content)
            })
            .collect();
        if visible.is_empty() {
            println!("  <TodoList> No todos, yay!");
        }
        for line in visible {
            println!("  <TodoList> {line}");
        }
    }

    fn render_filters(&self) {
        self.filters.watch(["filter"]);
        println!("  <VisibilityFilters> active: {}", self.filters.state().filter.as_str());
    }

    /// Apply a commit the way a host would: re-render in notification order.
    fn apply(&self, commit: Commit) {
        for consumer in commit.consumers() {
            if consumer == self.root.id() {
                self.render_root();
            } else if consumer == self.list.id() {
                self.render_list();
            } else if consumer == self.filters.id() {
                self.render_filters();
            }
        }
    }

    fn actions(&self) -> Option<Arc<TodoActions>> {
        self.list.actions::<TodoActions>()
    }
}

fn main() -> stowage::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();

    println!("=== Todo App ===\n");
    let registry = Registry::new();
    let app = App::mount(&registry)?;

    let Some(actions) = app.actions() else {
        println!("no actions shared");
        return Ok(());
    };

    println!("\n-- add two todos");
    app.apply(actions.add_todo("Buy milk"));
    app.apply(actions.add_todo("Write docs"));

    println!("\n-- toggle todo 1");
    app.apply(actions.toggle_todo(1));

    println!("\n-- show completed only");
    app.apply(actions.set_filter(Filter::Completed));

    println!("\n-- unmount and remount the app");
    drop(app);
    let app = App::mount(&registry)?;
    println!("\nactions shared again: {}", app.actions().is_some());

    Ok(())
}
