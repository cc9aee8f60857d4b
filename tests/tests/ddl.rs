use quarry::{Context, Datastore};
use quarry_driver_sqlite::{Sqlite, SqliteDialect};

use pretty_assertions::assert_eq;

/// A datastore over an empty database, no tables created yet.
async fn bare_datastore() -> (Datastore, Context) {
    tests::init_tracing();

    let ds = Datastore::builder()
        .schema(tests::schema())
        .connection_source(Sqlite::in_memory())
        .dialect(SqliteDialect::new())
        .build()
        .await
        .unwrap();

    (ds, Context::new("test"))
}

#[tokio::test]
async fn create_missing_tables_creates_the_schema() {
    let (ds, cx) = bare_datastore().await;

    assert!(!ds.table_exists(&cx, "users").await.unwrap());

    ds.create_missing_tables(&cx).await.unwrap();

    assert!(ds.table_exists(&cx, "users").await.unwrap());
    assert!(ds.table_exists(&cx, "orders").await.unwrap());
    assert_eq!(ds.list_tables(&cx).await.unwrap(), ["orders", "users"]);
    assert_eq!(
        ds.list_columns(&cx, "users").await.unwrap(),
        ["id", "name", "age"]
    );
    assert_eq!(
        ds.list_columns(&cx, "orders").await.unwrap(),
        ["id", "user_id", "total"]
    );
}

#[tokio::test]
async fn create_missing_tables_skips_existing_ones() {
    let (ds, cx) = bare_datastore().await;

    ds.create_missing_tables(&cx).await.unwrap();
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();
    ds.exec(&cx, ds.insert(users).value(name, "John Doe"))
        .await
        .unwrap();

    // A second pass leaves the existing tables and their rows alone.
    ds.create_missing_tables(&cx).await.unwrap();

    let rows = ds
        .query(&cx, ds.select([name]).from(users))
        .await
        .unwrap()
        .collect()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn ddl_renders_only_the_missing_tables() {
    let (ds, cx) = bare_datastore().await;

    let script = ds.ddl(&cx, false).await.unwrap();
    assert!(script.contains("CREATE TABLE \"users\""));
    assert!(script.contains("CREATE TABLE \"orders\""));
    assert!(script.contains("CREATE INDEX \"orders_user\""));
    // Table bodies come before any index.
    assert!(script.find("CREATE INDEX").unwrap() > script.rfind("CREATE TABLE").unwrap());

    ds.create_missing_tables(&cx).await.unwrap();
    assert_eq!(ds.ddl(&cx, false).await.unwrap(), "");
}

#[tokio::test]
async fn ddl_can_render_guarded_statements() {
    let (ds, cx) = bare_datastore().await;

    let script = ds.ddl(&cx, true).await.unwrap();
    assert!(script.contains("CREATE TABLE IF NOT EXISTS \"users\""));
}

#[tokio::test]
async fn missing_tables_surface_as_storage_engine_errors() {
    let (ds, cx) = bare_datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    // No tables were created; the engine rejects the statement.
    let err = ds
        .exec(&cx, ds.insert(users).value(name, "John Doe"))
        .await
        .unwrap_err();
    assert!(err.is_storage_engine());
}
