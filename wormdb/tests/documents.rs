use serde_json::{Value, json};
use std::{cell::Cell, io, rc::Rc};
use wormdb::{memory::InMemoryStore, prelude::*};

#[document]
pub struct User {
    name: Field,
    #[field(default = 18)]
    age: Field,
}

#[document(name = "accounts")]
pub struct Account {
    #[field(primary_key)]
    email: Field,
    #[field(name = "full_name")]
    name: Field,
}

fn seeded(values: Value) -> InMemoryStore {
    InMemoryStore::with_collections(serde_json::from_value(values).unwrap())
}

#[test]
fn generated_schema_puts_id_first() {
    let store = DocumentStore::new(InMemoryStore::new());
    let users = store.register::<User>().unwrap();

    let attributes: Vec<&str> = users
        .schema()
        .fields()
        .iter()
        .map(|(attribute, _)| attribute.as_str())
        .collect();
    assert_eq!(attributes, ["id", "name", "age"]);
    assert_eq!(users.schema().id_field(), "id");
    assert!(users.schema().is_auto_id());
    assert_eq!(users.name(), "User");
}

#[test]
fn auto_id_continues_after_the_largest_stored_id() {
    let store = DocumentStore::new(seeded(json!({
        "User": [{ "id": 3, "name": "a" }, { "id": 7, "name": "b" }, { "id": 5, "name": "c" }]
    })));
    let users = store.register::<User>().unwrap();

    assert_eq!(users.schema().next_id_seed(), Some(8));
    assert_eq!(users.create().id(), Some(&json!(8)));
}

#[test]
fn auto_id_starts_at_one_for_an_empty_collection() {
    let store = DocumentStore::new(InMemoryStore::new());
    let users = store.register::<User>().unwrap();
    assert_eq!(users.create().id(), Some(&json!(1)));
}

#[test]
fn float_ids_seed_the_counter() {
    let mut store = DocumentStore::new(seeded(json!({
        "User": [{ "id": 1.0, "name": "a" }, { "id": 2.0, "name": "b" }]
    })));
    let users = store.register::<User>().unwrap();
    assert_eq!(users.schema().next_id_seed(), Some(3));

    let mut carol = users.create();
    carol.set_name("Carol").unwrap();
    carol.save(&mut store).unwrap();

    assert_eq!(store.collection("User").len(), 3);
    assert_eq!(carol.id(), Some(&json!(3)));
}

#[test]
fn exhausted_counter_does_not_wrap() {
    let store = DocumentStore::new(seeded(json!({ "User": [{ "id": i64::MAX }] })));
    let users = store.register::<User>().unwrap();

    assert_eq!(users.create().id(), Some(&json!(i64::MAX)));
    assert_eq!(users.create().id(), Some(&json!(i64::MAX)));
}

#[test]
fn new_collections_are_appended_after_existing_ones() {
    let mut store = DocumentStore::new(seeded(json!({ "Zebra": [], "Post": [] })));
    let users = store.register::<User>().unwrap();

    let mut alice = users.create();
    alice.set_name("Alice").unwrap();
    alice.save(&mut store).unwrap();
    assert_eq!(store.list_collections(), ["Zebra", "Post", "User"]);

    store.drop_collection("Zebra").unwrap();
    assert_eq!(store.list_collections(), ["Post", "User"]);
}

#[test]
fn instances_created_in_sequence_get_distinct_ids() {
    let mut store = DocumentStore::new(InMemoryStore::new());
    let users = store.register::<User>().unwrap();

    let mut a = users.create();
    a.set_name("Alice").unwrap();
    let mut b = users.create();
    b.set_name("Bob").unwrap();

    a.save(&mut store).unwrap();
    b.save(&mut store).unwrap();

    let records = store.collection("User").records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], *json!({ "id": 1, "name": "Alice" }).as_object().unwrap());
    assert_eq!(records[1], *json!({ "id": 2, "name": "Bob" }).as_object().unwrap());

    let bobs = users.get(&store, &criteria!(name = "Bob"));
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].id(), Some(&json!(2)));
}

#[test]
fn alice_then_bob() {
    let mut store = DocumentStore::new(InMemoryStore::new());
    let users = store.register::<User>().unwrap();

    let mut a = users.create();
    a.set_name("Alice").unwrap();
    a.save(&mut store).unwrap();

    let found = users.get(&store, &criteria!(id = 1));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), Some(&json!("Alice")));

    let mut b = users.create();
    b.set_name("Bob").unwrap();
    b.save(&mut store).unwrap();
    assert_eq!(b.id(), Some(&json!(2)));

    let names: Vec<_> = users
        .get(&store, &criteria!())
        .iter()
        .map(|user| user.name().cloned())
        .collect();
    assert_eq!(names, [Some(json!("Alice")), Some(json!("Bob"))]);
}

#[test]
fn saved_document_round_trips_through_get() {
    let mut store = DocumentStore::new(InMemoryStore::new());
    let users = store.register::<User>().unwrap();

    let mut alice = users.create();
    alice.set_name("Alice").unwrap();
    alice.set_age(json!({ "years": 30, "tags": ["x"] })).unwrap();
    alice.save(&mut store).unwrap();

    let found = users.get(&store, &criteria!(id = 1));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].to_dict(), alice.to_dict());
}

#[test]
fn saving_twice_fails_and_keeps_one_record() {
    let mut store = DocumentStore::new(InMemoryStore::new());
    let users = store.register::<User>().unwrap();

    let mut alice = users.create();
    alice.set_name("Alice").unwrap();
    alice.save(&mut store).unwrap();

    let err = alice.save(&mut store).unwrap_err();
    assert!(matches!(err, DocumentStoreError::DocumentAlreadyExists(ref pk, ref c) if pk == "1" && c == "User"));
    assert_eq!(store.collection("User").len(), 1);
}

#[test]
fn update_of_an_unsaved_document_fails_without_changes() {
    let mut store = DocumentStore::new(InMemoryStore::new());
    let users = store.register::<User>().unwrap();

    let mut alice = users.create();
    alice.set_name("Alice").unwrap();
    alice.save(&mut store).unwrap();
    let before = store.collection("User").records().to_vec();

    let mut ghost = users.create();
    ghost.set_name("Ghost").unwrap();
    let err = ghost.update(&mut store).unwrap_err();

    assert!(matches!(err, DocumentStoreError::DocumentDoesNotExist(..)));
    assert_eq!(store.collection("User").records(), before.as_slice());
}

#[test]
fn update_merges_into_the_stored_record() {
    let mut store = DocumentStore::new(seeded(json!({
        "User": [{ "id": 1, "name": "Alice", "legacy": true }]
    })));
    let users = store.register::<User>().unwrap();

    let mut alice = users.create();
    alice.set_id(1).unwrap();
    alice.set_name("Alicia").unwrap();
    alice.update(&mut store).unwrap();

    assert_eq!(
        store.collection("User").records()[0],
        *json!({ "id": 1, "name": "Alicia", "legacy": true }).as_object().unwrap()
    );
}

#[test]
fn delete_removes_only_the_matching_record() {
    let mut store = DocumentStore::new(InMemoryStore::new());
    let users = store.register::<User>().unwrap();

    let mut alice = users.create();
    alice.set_name("Alice").unwrap();
    let mut bob = users.create();
    bob.set_name("Bob").unwrap();
    alice.save(&mut store).unwrap();
    bob.save(&mut store).unwrap();

    alice.delete(&mut store).unwrap();

    let remaining = users.get_raw(&store, &criteria!());
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].get("name"), Some(&json!("Bob")));

    assert!(matches!(alice.delete(&mut store), Err(DocumentStoreError::DocumentDoesNotExist(..))));
}

#[test]
fn null_is_replaced_by_the_field_default() {
    let store = DocumentStore::new(InMemoryStore::new());
    let users = store.register::<User>().unwrap();

    let mut bob = users.create();
    assert_eq!(bob.age(), None);

    bob.set_age(Value::Null).unwrap();
    assert_eq!(bob.age(), Some(&json!(18)));

    bob.set_age(40).unwrap();
    assert_eq!(bob.age(), Some(&json!(40)));

    bob.set_name(Value::Null).unwrap();
    assert_eq!(bob.name(), Some(&Value::Null));
}

#[test]
fn query_loaded_documents_keep_their_persisted_values() {
    let store = DocumentStore::new(seeded(json!({
        "User": [{ "id": 4, "name": "Dana", "age": null }]
    })));
    let users = store.register::<User>().unwrap();

    let dana = users.get(&store, &criteria!(name = "Dana")).remove(0);
    assert_eq!(dana.id(), Some(&json!(4)));
    assert_eq!(dana.age(), Some(&Value::Null));
}

#[test]
fn explicit_primary_key_and_storage_name() {
    let mut store = DocumentStore::new(InMemoryStore::new());
    let accounts = store.register::<Account>().unwrap();

    assert_eq!(accounts.name(), "accounts");
    assert!(!accounts.schema().is_auto_id());

    let mut ada = accounts.create();
    assert_eq!(ada.pk(), "email");
    assert!(ada.to_dict().is_empty());
    assert!(matches!(ada.save(&mut store), Err(DocumentStoreError::InvalidDocument(_))));

    ada.set_email("ada@example.com").unwrap();
    ada.set_name("Ada Lovelace").unwrap();
    ada.save(&mut store).unwrap();

    assert_eq!(
        store.collection("accounts").records()[0],
        *json!({ "email": "ada@example.com", "full_name": "Ada Lovelace" }).as_object().unwrap()
    );

    let found = accounts.get(&store, &criteria!("full_name" => "Ada Lovelace"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), Some(&json!("Ada Lovelace")));
    assert_eq!(found[0].pk_value(), Some(&json!("ada@example.com")));
}

#[test]
fn criteria_are_anded_and_need_every_field() {
    let store = DocumentStore::new(seeded(json!({
        "User": [
            { "id": 1, "name": "Alice", "age": 30 },
            { "id": 2, "name": "Alice", "age": 31.0 },
            { "id": 3, "name": "Bob" }
        ]
    })));
    let users = store.register::<User>().unwrap();

    assert_eq!(users.get(&store, &criteria!()).len(), 3);
    assert_eq!(users.get(&store, &criteria!(name = "Alice")).len(), 2);
    assert_eq!(users.get(&store, &criteria!(name = "Alice", age = 31)).len(), 1);
    assert!(users.get(&store, &criteria!(name = "Bob", age = 18)).is_empty());
    assert!(users.get(&store, &criteria!(name = "Carol")).is_empty());
}

#[test]
fn dynamic_schemas_without_the_macro() {
    let mut store = DocumentStore::new(InMemoryStore::new());

    let err = Schema::builder("Bad")
        .field("a", Field::new().primary_key(true))
        .field("b", Field::new().primary_key(true))
        .register(&store)
        .unwrap_err();
    assert!(matches!(err, DocumentStoreError::MultiplePrimaryKey(ref name) if name == "Bad"));

    let err = Schema::builder("Clash").field("id", Field::new()).register(&store).unwrap_err();
    assert!(matches!(err, DocumentStoreError::InvalidSchema(_)));

    let err = Schema::builder("Twice")
        .field("a", Field::new())
        .field("b", Field::new().named("a"))
        .register(&store)
        .unwrap_err();
    assert!(matches!(err, DocumentStoreError::InvalidSchema(_)));

    let notes = Schema::builder("Note")
        .field("body", Field::new())
        .register(&store)
        .unwrap();

    let mut note = DynDocument::new(&notes);
    note.set("body", "hello").unwrap();
    assert!(matches!(note.set("title", "x"), Err(DocumentStoreError::InvalidDocument(_))));
    note.save(&mut store).unwrap();

    let found = notes.get(&store, &Criteria::new().eq("body", "hello"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("id"), Some(&json!(1)));
    assert_eq!(store.list_collections(), ["Note"]);
}

#[test]
fn a_borrowed_backend_sees_every_write() {
    let mut backend = InMemoryStore::new();
    {
        let mut store = DocumentStore::new(&mut backend);
        let users = store.register::<User>().unwrap();
        let mut alice = users.create();
        alice.set_name("Alice").unwrap();
        alice.save(&mut store).unwrap();
    }

    assert_eq!(backend.collections()["User"].len(), 1);
}

#[test]
fn drop_collection_removes_it() {
    let mut store = DocumentStore::new(seeded(json!({ "User": [{ "id": 1 }], "Post": [] })));

    store.drop_collection("Post").unwrap();
    assert_eq!(store.list_collections(), ["User"]);
    assert!(matches!(
        store.drop_collection("Post"),
        Err(DocumentStoreError::CollectionNotFound(ref name)) if name == "Post"
    ));
}

/// Backend whose saves fail while the shared flag is raised.
#[derive(Debug)]
struct FlakyStore {
    inner: InMemoryStore,
    failing: Rc<Cell<bool>>,
}

impl StoreBackend for FlakyStore {
    fn collections(&self) -> &wormdb::backend::Collections {
        self.inner.collections()
    }

    fn collections_mut(&mut self) -> &mut wormdb::backend::Collections {
        self.inner.collections_mut()
    }

    fn load(&mut self) -> DocumentStoreResult<()> {
        Ok(())
    }

    fn save(&self) -> DocumentStoreResult<()> {
        if self.failing.get() {
            return Err(DocumentStoreError::io("flaky.json", io::Error::other("disk full")));
        }
        Ok(())
    }
}

#[test]
fn failed_saves_leave_memory_as_it_was() {
    let failing = Rc::new(Cell::new(false));
    let mut store = DocumentStore::new(FlakyStore {
        inner: seeded(json!({ "Zebra": [] })),
        failing: Rc::clone(&failing),
    });
    let users = store.register::<User>().unwrap();
    let accounts = store.register::<Account>().unwrap();

    let mut alice = users.create();
    alice.set_name("Alice").unwrap();
    alice.save(&mut store).unwrap();
    let before = store.collection("User").records().to_vec();

    failing.set(true);

    let mut bob = users.create();
    bob.set_name("Bob").unwrap();
    assert!(matches!(bob.save(&mut store), Err(DocumentStoreError::Io { .. })));

    alice.set_name("Alicia").unwrap();
    assert!(alice.update(&mut store).is_err());
    assert!(alice.delete(&mut store).is_err());
    assert!(store.drop_collection("User").is_err());
    assert!(store.drop_collection("Zebra").is_err());
    assert_eq!(store.collection("User").records(), before.as_slice());
    assert_eq!(store.list_collections(), ["Zebra", "User"]);

    let mut ada = accounts.create();
    ada.set_email("ada@example.com").unwrap();
    assert!(ada.save(&mut store).is_err());
    assert!(!store.collection("accounts").exists());
}
