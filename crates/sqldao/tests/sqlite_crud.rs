//! End-to-end CRUD against an in-memory SQLite database.

use rusqlite::Connection;
use sqldao::{
    ColumnSchema, ColumnType, Dao, DaoOptions, DeleteMethod, Dialect, Filter, Listing, OrderBy,
    Record, Value,
};

fn open(ddl: &str) -> Connection {
    let conn = Connection::open_in_memory().expect("open sqlite");
    conn.execute_batch(ddl).expect("create schema");
    conn
}

fn users_schema() -> ColumnSchema {
    ColumnSchema::new()
        .column("id", ColumnType::Integer)
        .column("name", ColumnType::Text)
        .column("active", ColumnType::Text)
}

const USERS_DDL: &str = r#"
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        active TEXT NOT NULL DEFAULT '1'
    );
"#;

fn soft_delete_users(conn: &Connection) -> Dao {
    let options = DaoOptions::new("id")
        .delete_method(DeleteMethod::Deactivate)
        .deactivate_column("active");
    Dao::for_connection(conn, "users", users_schema(), options).expect("valid config")
}

#[test]
fn soft_delete_lifecycle() {
    let conn = open(USERS_DDL);
    let users = soft_delete_users(&conn);
    assert_eq!(users.dialect(), Dialect::Ansi);

    let id = users
        .create(&conn, &Record::new().with("name", "x"))
        .unwrap();
    let Value::Integer(n) = id else {
        panic!("expected an integer key, got {id:?}");
    };

    let row = users.get(&conn, n).unwrap().expect("row exists");
    assert_eq!(
        row,
        Record::new().with("id", n).with("name", "x").with("active", "1")
    );
    assert!(users.exists(&conn, n).unwrap());

    users.delete(&conn, n).unwrap();

    // Row is still there, flagged inactive.
    let row = users.get(&conn, n).unwrap().expect("row still exists");
    assert_eq!(row.get("active"), Some(&Value::from("0")));
    assert!(!users.exists(&conn, n).unwrap());

    let inactive = vec![Filter::eq("active", "0")];
    let keyed = users
        .list_keyed(&conn, Some(inactive.as_slice()), None)
        .unwrap();
    assert!(keyed.contains_key(&Value::Integer(n)));

    // Without filters only active rows are listed or counted.
    assert!(users.list_rows(&conn, None, None).unwrap().is_empty());
    assert_eq!(users.count(&conn, None).unwrap(), 0);
}

#[test]
fn hard_delete_removes_row() {
    let conn = open(USERS_DDL);
    let users = Dao::for_connection(&conn, "users", users_schema(), DaoOptions::new("id")).unwrap();

    let id = users
        .create(&conn, &Record::new().with("name", "gone"))
        .unwrap();
    assert!(users.exists(&conn, id.clone()).unwrap());

    users.delete(&conn, id.clone()).unwrap();
    assert!(!users.exists(&conn, id.clone()).unwrap());
    assert_eq!(users.get(&conn, id).unwrap(), None);
}

#[test]
fn create_empty_record_uses_defaults() {
    let conn = open(
        "CREATE TABLE events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT DEFAULT 'ping',
            seen INTEGER DEFAULT 0
        );",
    );
    let schema = ColumnSchema::new()
        .column("id", ColumnType::Integer)
        .column("kind", ColumnType::Text)
        .column("seen", ColumnType::Integer);
    let events = Dao::for_connection(&conn, "events", schema, DaoOptions::new("id")).unwrap();

    let first = events.create(&conn, &Record::new()).unwrap();
    let second = events.create(&conn, &Record::new()).unwrap();
    assert_eq!(first, Value::Integer(1));
    assert_eq!(second, Value::Integer(2));

    let row = events.get(&conn, 2).unwrap().unwrap();
    assert_eq!(row.get("kind"), Some(&Value::from("ping")));
    assert_eq!(row.get("seen"), Some(&Value::Integer(0)));
}

#[test]
fn autogenerated_key_in_record_is_ignored() {
    let conn = open(USERS_DDL);
    let users = Dao::for_connection(&conn, "users", users_schema(), DaoOptions::new("id")).unwrap();

    let id = users
        .create(&conn, &Record::new().with("id", 500).with("name", "x"))
        .unwrap();
    assert_eq!(id, Value::Integer(1));
    assert_eq!(users.get(&conn, 500).unwrap(), None);
}

#[test]
fn supplied_keys_update_and_rename() {
    let conn = open("CREATE TABLE tags (slug TEXT PRIMARY KEY, label TEXT, weight INTEGER);");
    let schema = ColumnSchema::new()
        .column("slug", ColumnType::Text)
        .column("label", ColumnType::Text)
        .column("weight", ColumnType::Integer);
    let tags = Dao::for_connection(
        &conn,
        "tags",
        schema,
        DaoOptions::new("slug").key_is_autogenerated(false),
    )
    .unwrap();

    let key = tags
        .create(&conn, &Record::new().with("slug", "rust").with("label", "Rust").with("weight", "3"))
        .unwrap();
    assert_eq!(key, Value::from("rust"));

    let err = tags
        .create(&conn, &Record::new().with("label", "no key"))
        .unwrap_err();
    assert!(err.is_missing_key());

    tags.update(&conn, &Record::new().with("slug", "rust").with("weight", 5))
        .unwrap();
    let row = tags.get(&conn, "rust").unwrap().unwrap();
    assert_eq!(row.get("label"), Some(&Value::from("Rust")));
    assert_eq!(row.get("weight"), Some(&Value::Integer(5)));

    let err = tags
        .update(&conn, &Record::new().with("weight", 1))
        .unwrap_err();
    assert!(err.is_missing_key());

    tags.update_key(&conn, "rust", "rustlang").unwrap();
    assert!(!tags.exists(&conn, "rust").unwrap());
    assert!(tags.exists(&conn, "rustlang").unwrap());
}

#[test]
fn list_filters_order_and_shapes() {
    let conn = open(USERS_DDL);
    let users = Dao::for_connection(&conn, "users", users_schema(), DaoOptions::new("id")).unwrap();
    for name in ["carol", "alice", "bob", "anna"] {
        users
            .create(&conn, &Record::new().with("name", name))
            .unwrap();
    }

    let filters = vec![Filter::like("name", "a%")];
    let order = vec![OrderBy::desc("name")];
    let rows = users
        .list_rows(&conn, Some(filters.as_slice()), Some(order.as_slice()))
        .unwrap();
    let names: Vec<_> = rows.iter().filter_map(|r| r.get("name")).collect();
    assert_eq!(names, vec![&Value::from("anna"), &Value::from("alice")]);

    let order = vec![OrderBy::asc("name")];
    match users.list(&conn, true, None, Some(order.as_slice())).unwrap() {
        Listing::Keyed(keyed) => {
            let keys: Vec<_> = keyed.keys().cloned().collect();
            // alice(2), anna(4), bob(3), carol(1)
            assert_eq!(
                keys,
                vec![
                    Value::Integer(2),
                    Value::Integer(4),
                    Value::Integer(3),
                    Value::Integer(1)
                ]
            );
            for (key, row) in keyed.iter() {
                assert_eq!(row.get("id"), Some(key));
            }
        }
        other => panic!("expected keyed listing, got {other:?}"),
    }

    let filters = vec![Filter::gte("id", 2), Filter::is_not_null("name")];
    assert_eq!(users.count(&conn, Some(filters.as_slice())).unwrap(), 3);
}

#[test]
fn null_filters_match_nulls() {
    let conn = open(USERS_DDL);
    let users = Dao::for_connection(&conn, "users", users_schema(), DaoOptions::new("id")).unwrap();
    users.create(&conn, &Record::new().with("name", "x")).unwrap();
    users
        .create(&conn, &Record::new().with("name", Value::Null))
        .unwrap();

    let filters = vec![Filter::raw("name", "IS NULL", Some(Value::from("ignored")))];
    assert_eq!(users.count(&conn, Some(filters.as_slice())).unwrap(), 1);
}

#[test]
fn execution_errors_propagate() {
    let conn = open("CREATE TABLE other (id INTEGER PRIMARY KEY);");
    let users = Dao::for_connection(&conn, "users", users_schema(), DaoOptions::new("id")).unwrap();
    let err = users.count(&conn, None).unwrap_err();
    assert!(matches!(err, sqldao::DaoError::Sqlite(_)));
}
