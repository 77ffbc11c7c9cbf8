//! Todos Demo
//!
//! Walks through the PostgREST "todo" tutorial schema with pgrst.
//!
//! ```text
//! PGRST_URL=http://localhost:3000 \
//! PGRST_SECRET=reallyreallyreallyreallyverysafe \
//! RUST_LOG=pgrst=debug cargo run -p todos-demo
//! ```

// Demo-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use std::time::Duration;

use pgrst::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Data Types
// ============================================================================

/// A row of `api.todos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub task: String,
    pub done: bool,
}

/// Payload creating a todo.
#[derive(Debug, Clone, Serialize)]
pub struct NewTodo {
    pub task: String,
}

// ============================================================================
// Operations
// ============================================================================

/// Open todos, oldest first, with the total count.
pub async fn open_todos(session: &Session, limit: usize) -> pgrst::Result<(Vec<Todo>, u64)> {
    let mut todos: Vec<Todo> = Vec::new();
    let outcome = session
        .select()
        .table("todos")
        .filter("done", Filter::Equal, "false")
        .query("order", "id.asc")
        .limit(limit)
        .with_count(CountMode::Exact)
        .output(Output::rows(&mut todos))
        .exec()
        .await?;

    Ok((todos, outcome.count()))
}

/// Add a todo; returns `false` if the task already exists.
pub async fn add_todo(session: &Session, task: &str) -> pgrst::Result<bool> {
    let todo = NewTodo {
        task: task.to_string(),
    };
    let outcome = session
        .insert()
        .table("todos")
        .role("todo_user")
        .input(&todo)
        .exec()
        .await?;

    if let Some(record) = outcome.db_response() {
        info!(%record, "todo already exists");
    }
    Ok(outcome.is_success())
}

/// Mark a todo as done; returns `false` if no todo has this id.
pub async fn complete(session: &Session, id: u64) -> pgrst::Result<bool> {
    let outcome = session
        .update()
        .table("todos")
        .role("todo_user")
        .filter("id", Filter::Equal, id.to_string())
        .input(&serde_json::json!({ "done": true }))
        .exec()
        .await?;

    Ok(outcome.is_success())
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> pgrst::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let url = std::env::var("PGRST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let secret = std::env::var("PGRST_SECRET")
        .unwrap_or_else(|_| "reallyreallyreallyreallyverysafe".to_string());

    let session = Session::new(&url, "web_anon", secret, Duration::from_secs(300))?;
    println!("Session created for {}", session.base_url());

    add_todo(&session, "try pgrst").await?;

    let (todos, total) = open_todos(&session, 10).await?;
    println!("{} open todos (showing {}):", total, todos.len());
    for todo in &todos {
        println!("  #{} {}", todo.id, todo.task);
    }

    if let Some(first) = todos.first() {
        let updated = complete(&session, first.id).await?;
        println!("Completed #{}: {updated}", first.id);
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
