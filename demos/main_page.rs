//! Two-pane page: a header and a body sharing one store
//!
//! Only the pane whose text changed is re-rendered.

use std::convert::Infallible;

use stowage::{Commit, Handle, Keyed, Reducer, Registry, SharedData, StoreOptions, Value};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct PageState {
    header: String,
    body: String,
}

impl Keyed for PageState {
    fn value(&self, key: &str) -> Value {
        match key {
            "header" => self.header.as_str().into(),
            "body" => self.body.as_str().into(),
            _ => Value::Absent,
        }
    }
}

enum PageAction {
    UpdateHeader(String),
    UpdateBody(String),
}

struct PageReducer;

impl Reducer for PageReducer {
    type State = PageState;
    type Action = PageAction;
    type Error = Infallible;

    fn reduce(&self, state: &PageState, action: PageAction) -> Result<PageState, Infallible> {
        Ok(match action {
            PageAction::UpdateHeader(header) => PageState {
                header,
                ..state.clone()
            },
            PageAction::UpdateBody(body) => PageState {
                body,
                ..state.clone()
            },
        })
    }
}

fn render(label: &str, handle: &Handle<PageReducer>, key: &str) {
    handle.watch([key]);
    let state = handle.state();
    let text = match key {
        "header" => &state.header,
        _ => &state.body,
    };
    println!("  <{label}> {text}");
}

fn rerender(commit: &Commit, header: &Handle<PageReducer>, body: &Handle<PageReducer>) {
    for consumer in commit.consumers() {
        if consumer == header.id() {
            render("Header", header, "header");
        } else if consumer == body.id() {
            render("Body", body, "body");
        } else {
            println!("  <MainPage> (owner re-render)");
        }
    }
}

fn main() -> stowage::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();

    println!("=== Main Page ===\n");
    let registry = Registry::new();
    let page = registry.create_or_attach(
        "main_page",
        PageReducer,
        PageState {
            header: "Header".to_string(),
            body: "Body".to_string(),
        },
        StoreOptions::new().cache(false),
    )?;
    page.share_data(SharedData::new().with("theme", "light"));

    let header = registry.attach::<PageReducer>("main_page")?;
    let body = registry.attach::<PageReducer>("main_page")?;
    render("Header", &header, "header");
    render("Body", &body, "body");

    println!("\n-- body button clicked");
    let commit = body
        .dispatch(PageAction::UpdateBody("Updated Body".to_string()))
        .unwrap_or_else(|never| match never {});
    rerender(&commit, &header, &body);

    println!("\n-- header renamed");
    let commit = header
        .dispatch(PageAction::UpdateHeader("New Header".to_string()))
        .unwrap_or_else(|never| match never {});
    rerender(&commit, &header, &body);

    let theme = header
        .shared()
        .and_then(|shared| shared.get("theme").and_then(|v| v.as_str().map(str::to_owned)));
    println!("\ntheme shared by the page: {theme:?}");

    println!("\n-- page torn down without caching");
    drop((page, header, body));
    let page = registry.create_or_attach(
        "main_page",
        PageReducer,
        PageState {
            header: "Header".to_string(),
            body: "Body".to_string(),
        },
        StoreOptions::new().cache(false),
    )?;
    println!("  state after remount: {:?}", page.state());

    Ok(())
}
