//! End-to-end scenarios driving compiled chunks through a minimal host store.

use serde_json::{json, Map, Value};
use storechunk::chunk::{build_store_chunk, BuildError, ChunkOptions, StoreChunk, StoreChunkBuilder};
use storechunk::reducer::{create_combined_action, Action};
use storechunk::structure::{array_of, number, reducer, shape, string, Structure};
use storechunk::validation::validate_shape;

/// Holds the global state and mounts each chunk under its name.
struct TestStore {
    state: Value,
    chunks: Vec<StoreChunk>,
}

impl TestStore {
    fn new(chunks: Vec<StoreChunk>) -> Self {
        let mut store = Self {
            state: Value::Object(Map::new()),
            chunks,
        };
        store.dispatch(&Action::init());
        store
    }

    fn dispatch(&mut self, action: &Action) {
        let mut next = Map::new();
        for chunk in &self.chunks {
            let previous = self.state.get(chunk.name());
            next.insert(chunk.name().to_string(), chunk.reducer().reduce(previous, action));
        }
        self.state = Value::Object(next);
    }

    fn select(&self, chunk: usize, path: &[&str]) -> Option<Value> {
        let chunk = &self.chunks[chunk];
        let selector = if path.is_empty() {
            chunk.selectors.as_leaf()?
        } else {
            chunk.selectors.leaf(path)?
        };
        selector.select(&self.state).cloned()
    }
}

#[test]
fn string_leaf_replace_then_reset() {
    let chunk = build_store_chunk(
        "title",
        &string().with_default(json!("foo")),
        ChunkOptions::default(),
    )
    .unwrap();
    let actions = chunk.actions.as_leaf().unwrap().clone();
    let mut store = TestStore::new(vec![chunk]);

    store.dispatch(&actions.replace(json!("bar")));
    assert_eq!(store.select(0, &[]), Some(json!("bar")));

    store.dispatch(&actions.reset());
    assert_eq!(store.select(0, &[]), Some(json!("foo")));
}

#[test]
fn array_leaf_replace_then_remove_at_index() {
    let chunk = build_store_chunk(
        "numbers",
        &array_of(number()).with_default(json!([1, 2, 3])),
        ChunkOptions::default(),
    )
    .unwrap();
    let actions = chunk.actions.as_leaf().unwrap().clone();
    let mut store = TestStore::new(vec![chunk]);
    assert_eq!(store.select(0, &[]), Some(json!([1, 2, 3])));

    store.dispatch(&actions.replace(json!([4, 5, 6])));
    store.dispatch(&actions.remove_at_index(1).unwrap());
    assert_eq!(store.select(0, &[]), Some(json!([4, 6])));
}

#[test]
fn shape_leaf_update_replaces_nested_array() {
    let chunk = build_store_chunk(
        "example",
        &shape(vec![("arrayExample", array_of(string()))]),
        ChunkOptions::default(),
    )
    .unwrap();
    let actions = chunk.actions.as_leaf().unwrap().clone();
    let mut store = TestStore::new(vec![chunk]);

    store.dispatch(&actions.replace(json!({"arrayExample": ["2"]})));
    store.dispatch(&actions.update(json!({"arrayExample": []})).unwrap());
    assert_eq!(store.select(0, &[]), Some(json!({"arrayExample": []})));
}

#[test]
fn mismatched_nested_container_is_coerced() {
    let structure = shape(vec![
        ("test1", shape(vec![("test2", string())])),
        ("test2", string()),
    ]);
    let output = validate_shape(&structure, &json!({"test1": "foo", "test2": "bar"}));
    assert_eq!(output, json!({"test1": {}, "test2": "bar"}));
}

#[test]
fn combined_action_then_reset_all_restores_defaults() {
    let structure = shape(vec![
        (
            "pair",
            reducer(shape(vec![("foo", number()), ("bar", string())])),
        ),
        ("label", string().with_default(json!("start"))),
    ]);
    let chunk = build_store_chunk("app", &structure, ChunkOptions::default()).unwrap();
    let foo = chunk.actions.leaf(&["pair", "foo"]).unwrap().clone();
    let bar = chunk.actions.leaf(&["pair", "bar"]).unwrap().clone();
    let label = chunk.actions.leaf(&["label"]).unwrap().clone();
    let reset_pair = chunk.actions.get("pair").unwrap().reset_all().unwrap();
    let mut store = TestStore::new(vec![chunk]);

    store.dispatch(&create_combined_action(
        "touch everything",
        vec![
            foo.replace(json!(12)),
            bar.replace(json!("baz")),
            label.replace(json!("changed")),
        ],
    ));
    assert_eq!(store.select(0, &["pair", "foo"]), Some(json!(12)));
    assert_eq!(store.select(0, &["pair", "bar"]), Some(json!("baz")));
    assert_eq!(store.select(0, &["label"]), Some(json!("changed")));

    store.dispatch(&reset_pair.create(Value::Null));
    assert_eq!(
        store.state.get("app").and_then(|app| app.get("pair")),
        Some(&json!({"foo": 0, "bar": ""}))
    );
    // Outside the reset boundary.
    assert_eq!(store.select(0, &["label"]), Some(json!("changed")));
}

#[test]
fn reset_all_leaves_sibling_boundaries_untouched() {
    let structure = shape(vec![
        ("left", reducer(shape(vec![("n", number())]))),
        ("right", reducer(shape(vec![("n", number())]))),
    ]);
    let chunk = build_store_chunk("sides", &structure, ChunkOptions::default()).unwrap();
    let left = chunk.actions.leaf(&["left", "n"]).unwrap().clone();
    let right = chunk.actions.leaf(&["right", "n"]).unwrap().clone();
    let reset_left = chunk.actions.get("left").unwrap().reset_all().unwrap();
    let reset_everything = chunk.reset_all.clone().unwrap();
    let mut store = TestStore::new(vec![chunk]);

    store.dispatch(&left.replace(json!(1)));
    store.dispatch(&right.replace(json!(2)));
    store.dispatch(&reset_left.create(Value::Null));
    assert_eq!(store.select(0, &["left", "n"]), Some(json!(0)));
    assert_eq!(store.select(0, &["right", "n"]), Some(json!(2)));

    store.dispatch(&reset_everything.create(Value::Null));
    assert_eq!(store.select(0, &["right", "n"]), Some(json!(0)));
}

#[test]
fn chunks_do_not_react_to_each_other() {
    let first = build_store_chunk("first", &number(), ChunkOptions::default()).unwrap();
    let second = build_store_chunk("second", &number(), ChunkOptions::default()).unwrap();
    let first_actions = first.actions.as_leaf().unwrap().clone();
    let mut store = TestStore::new(vec![first, second]);

    store.dispatch(&first_actions.replace(json!(10)));
    assert_eq!(store.select(0, &[]), Some(json!(10)));
    assert_eq!(store.select(1, &[]), Some(json!(0)));
}

#[test]
fn chunk_can_be_mounted_at_custom_location() {
    let chunk = StoreChunkBuilder::new("settings")
        .structure(shape(vec![
            ("theme", string().with_default(json!("light"))),
            ("panel", reducer(shape(vec![("open", storechunk::structure::boolean())]))),
        ]))
        .location("ui.settings")
        .build()
        .unwrap();

    let open = chunk.actions.leaf(&["panel", "open"]).unwrap();
    assert_eq!(open.replace(json!(true)).action_type, "ui.settings.panel.open/REPLACE");
    assert_eq!(
        chunk.reset_all.as_ref().map(|creator| creator.action_type().to_string()),
        Some("ui.settings/RESET_ALL".to_string())
    );
}

#[test]
fn missing_structure_is_a_build_error() {
    let err = StoreChunkBuilder::new("empty").build().unwrap_err();
    assert!(matches!(err, BuildError::MissingStructure));
    assert!(err.to_string().contains("structure"));
}

#[test]
fn malicious_payloads_never_break_dispatch() {
    let structure = shape(vec![
        ("profile", reducer(shape(vec![
            ("name", string()),
            ("tags", array_of(string())),
            ("address", shape(vec![("city", string())])),
        ]))),
    ]);
    let chunk = build_store_chunk("user", &structure, ChunkOptions::default()).unwrap();
    let address = chunk.actions.leaf(&["profile", "address"]).unwrap().clone();
    let tags = chunk.actions.leaf(&["profile", "tags"]).unwrap().clone();
    let mut store = TestStore::new(vec![chunk]);

    store.dispatch(&address.replace(json!({"city": 42, "zip": "x"})));
    store.dispatch(&tags.replace(json!({"not": "an array"})));
    store.dispatch(&address.update(json!("garbage")).unwrap());

    assert_eq!(store.select(0, &["profile", "address"]), Some(json!({})));
    assert_eq!(store.select(0, &["profile", "tags"]), Some(json!([])));
}

#[test]
fn scalar_boundary_is_compiled_and_reset_on_its_own() {
    let structure = shape(vec![
        ("a", reducer(string().with_default(json!("start")))),
        ("b", number()),
    ]);
    let chunk = build_store_chunk("app", &structure, ChunkOptions::default()).unwrap();
    assert!(chunk.is_nested());
    assert_eq!(chunk.actions.keys(), vec!["a", "b"]);

    let a = chunk.actions.leaf(&["a"]).unwrap().clone();
    let b = chunk.actions.leaf(&["b"]).unwrap().clone();
    let reset_everything = chunk.reset_all.clone().unwrap();
    let mut store = TestStore::new(vec![chunk]);

    store.dispatch(&create_combined_action(
        "set both",
        vec![a.replace(json!("changed")), b.replace(json!(4))],
    ));
    assert_eq!(store.select(0, &["a"]), Some(json!("changed")));

    store.dispatch(&a.reset());
    assert_eq!(store.select(0, &["a"]), Some(json!("start")));
    assert_eq!(store.select(0, &["b"]), Some(json!(4)));

    store.dispatch(&reset_everything.create(Value::Null));
    assert_eq!(store.select(0, &["b"]), Some(json!(0)));
}

#[test]
fn lazily_declared_boundary_gets_its_own_reset_all() {
    let structure = shape(vec![
        (
            "inner",
            Structure::lazy(|| reducer(shape(vec![("x", number())]))),
        ),
        ("b", number()),
    ]);
    let chunk = build_store_chunk("app", &structure, ChunkOptions::default()).unwrap();
    assert!(chunk.is_nested());
    assert_eq!(chunk.actions.keys(), vec!["inner", "b"]);

    let x = chunk.actions.leaf(&["inner", "x"]).unwrap().clone();
    let b = chunk.actions.leaf(&["b"]).unwrap().clone();
    let reset_inner = chunk.actions.get("inner").unwrap().reset_all().unwrap();
    let mut store = TestStore::new(vec![chunk]);

    store.dispatch(&x.replace(json!(3)));
    store.dispatch(&b.replace(json!(5)));
    store.dispatch(&reset_inner.create(Value::Null));
    assert_eq!(store.select(0, &["inner", "x"]), Some(json!(0)));
    assert_eq!(store.select(0, &["b"]), Some(json!(5)));
}

#[test]
fn dotted_property_does_not_collide_with_nested_path() {
    let structure = shape(vec![
        ("a", reducer(shape(vec![("b", string())]))),
        ("a.b", string()),
    ]);
    let chunk = build_store_chunk("app", &structure, ChunkOptions::default()).unwrap();
    let nested = chunk.actions.leaf(&["a", "b"]).unwrap().clone();
    let dotted = chunk.actions.leaf(&["a.b"]).unwrap().clone();
    assert_ne!(
        nested.replace(json!("")).action_type,
        dotted.replace(json!("")).action_type
    );
    let mut store = TestStore::new(vec![chunk]);

    store.dispatch(&dotted.replace(json!("only-dotted")));
    assert_eq!(
        store.state,
        json!({"app": {"a": {"b": ""}, "a.b": "only-dotted"}})
    );

    store.dispatch(&nested.replace(json!("only-nested")));
    assert_eq!(store.select(0, &["a.b"]), Some(json!("only-dotted")));
    assert_eq!(store.select(0, &["a", "b"]), Some(json!("only-nested")));
}

#[test]
fn plain_intermediate_shapes_have_no_reset_all() {
    let structure = shape(vec![(
        "panel",
        shape(vec![("inner", reducer(shape(vec![("x", number())])))]),
    )]);
    let chunk = build_store_chunk("ui", &structure, ChunkOptions::default()).unwrap();

    assert!(chunk.actions.get("panel").unwrap().reset_all().is_none());
    assert!(chunk.actions.at(&["panel", "inner"]).unwrap().reset_all().is_some());
    assert!(chunk.reset_all.is_some());
}
