//! # Chapter 1: Filters & Payloads
//!
//! Narrow a read down, page through it, and write rows.
//!
//! ## Filters
//!
//! Each filter becomes one `field=<op>.<value>` query parameter:
//!
//! ```ignore
//! use pgrst::{Filter, Output};
//!
//! session
//!     .select()
//!     .table("todos")
//!     .columns(["id", "task"])                       // select=id,task
//!     .filter("done", Filter::Equal, "false")        // done=eq.false
//!     .filter("id", Filter::GreaterThanOrEqual, "10") // id=gte.10
//!     .filter_in("owner", ["alice", "bob"])          // owner=in.(alice,bob)
//!     .output(Output::rows(&mut todos))
//!     .exec()
//!     .await?;
//! ```
//!
//! | Filter | Code |
//! |--------|------|
//! | `Filter::Equal` | `eq` |
//! | `Filter::GreaterThan` | `gt` |
//! | `Filter::GreaterThanOrEqual` | `gte` |
//! | `Filter::LessThan` | `lt` |
//! | `Filter::LessThanOrEqual` | `lte` |
//! | `Filter::NotEqual` | `neq` |
//!
//! Anything else PostgREST understands goes through the raw helpers:
//!
//! ```ignore
//! session
//!     .select()
//!     .table("todos")
//!     .query("order", "id.desc")
//!     .header("Accept-Profile", "api")
//!     .output(Output::rows(&mut todos))
//!     .exec()
//!     .await?;
//! ```
//!
//! ## Pagination
//!
//! ```ignore
//! use pgrst::CountMode;
//!
//! let outcome = session
//!     .select()
//!     .table("todos")
//!     .limit(25)
//!     .offset(50)
//!     .with_count(CountMode::Exact) // Prefer: count=exact
//!     .output(Output::rows(&mut page))
//!     .exec()
//!     .await?;
//!
//! let (start, end) = outcome.range();
//! println!("rows {start}..={end} of {}", outcome.count());
//! ```
//!
//! ## Single Rows
//!
//! PostgREST returns an array even for a primary-key lookup.
//! [`Output::row`](crate::Output::row) unwraps a one-element array and
//! leaves the destination untouched otherwise:
//!
//! ```ignore
//! let mut todo = Todo::default();
//! session
//!     .select()
//!     .table("todos")
//!     .filter("id", Filter::Equal, "1")
//!     .output(Output::row(&mut todo))
//!     .exec()
//!     .await?;
//! ```
//!
//! ## Writes
//!
//! `input` takes any `Serialize` value and sends it as JSON:
//!
//! ```ignore
//! let todo = NewTodo { task: "water plants".into() };
//! session.insert().table("todos").input(&todo).exec().await?;
//!
//! // Prefer: resolution=merge-duplicates
//! session.upsert().table("todos").input(&todos).exec().await?;
//!
//! session
//!     .update()
//!     .table("todos")
//!     .filter("id", Filter::Equal, "1")
//!     .input(&serde_json::json!({ "done": true }))
//!     .exec()
//!     .await?;
//!
//! session.delete().table("todos").filter("done", Filter::Equal, "true").exec().await?;
//! ```
//!
//! ## Functions and Roles
//!
//! ```ignore
//! let mut sum = String::new();
//! session
//!     .select()
//!     .rpc("add_them")          // GET /rpc/add_them?a=1&b=2
//!     .query("a", "1")
//!     .query("b", "2")
//!     .role("todo_user")        // token signed for another role
//!     .output(Output::text(&mut sum))
//!     .exec()
//!     .await?;
//! ```
//!
//! ## Deriving Builders
//!
//! A builder can start another verb on the same table and role. The new
//! builder always starts without parameters:
//!
//! ```ignore
//! let todos = session.select().table("todos").role("todo_user");
//! let mut cleanup = todos.delete().filter("done", Filter::Equal, "true");
//! cleanup.exec().await?;
//! ```
//!
//! ## Next Steps
//!
//! - [Chapter 2: Outcomes & Errors][super::chapter_2] - What `exec` returns
