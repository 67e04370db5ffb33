//! Todo Store
//!
//! This example compiles a small todo application structure and drives it
//! through a hand-written dispatch loop.
//!
//! Key concepts:
//! - Declaring nested structures with reducer boundaries
//! - Leaf action creators (replace, update, reset, remove_at_index)
//! - Combined actions and reset-all
//! - Sanitizing untrusted payloads
//!
//! Run with: cargo run --example todo_store

use serde_json::{json, Value};
use storechunk::chunk::{build_store_chunk, ChunkOptions};
use storechunk::reducer::create_combined_action;
use storechunk::shape;
use storechunk::structure::{array_of, boolean, number, reducer, string, wildcard_key};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Todo Store Example ===\n");

    let todo = shape! {
        "title" => string(),
        "done" => boolean(),
    };
    let structure = shape! {
        "filter" => string().with_default(json!("all")),
        "todos" => reducer(shape! {
            "items" => array_of(todo),
            "counts" => shape! { wildcard_key() => number() },
        }),
    };

    let chunk = build_store_chunk("todoApp", &structure, ChunkOptions::default())?;
    let mut state = json!({ "todoApp": chunk.initial_state() });
    println!("Initial state: {state}\n");

    let items = chunk
        .actions
        .leaf(&["todos", "items"])
        .ok_or("missing todos.items")?
        .clone();
    let counts = chunk
        .actions
        .leaf(&["todos", "counts"])
        .ok_or("missing todos.counts")?
        .clone();
    let filter = chunk.actions.leaf(&["filter"]).ok_or("missing filter")?.clone();

    let mut dispatch = |action: &storechunk::Action| {
        let next = chunk.reducer().reduce(state.get("todoApp"), action);
        state = json!({ "todoApp": next });
        println!("  {} -> {}", action.action_type, state);
    };

    println!("Example 1: Untrusted payload is sanitized");
    dispatch(&items.replace(json!([
        {"title": "write docs", "done": false},
        {"title": 42, "done": "yes"},
        "not a todo",
    ])));

    println!("\nExample 2: Combined action");
    let batch = create_combined_action(
        "complete and count",
        vec![
            counts.update(json!({"open": 0, "closed": 1})).ok_or("counts is not a shape")?,
            filter.replace(json!("closed")),
        ],
    );
    dispatch(&batch);

    println!("\nExample 3: Remove by index and reset everything");
    dispatch(&items.remove_at_index(0).ok_or("items is not an array")?);
    let reset_all = chunk.reset_all.as_ref().ok_or("chunk is not nested")?;
    dispatch(&reset_all.create(Value::Null));

    println!("\n=== Example Complete ===");
    Ok(())
}
