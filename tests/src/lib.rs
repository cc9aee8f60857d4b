pub mod recording;

use quarry::{Context, Datastore, Schema};
use quarry_core::schema::Type;
use quarry_driver_sqlite::{Sqlite, SqliteDialect};

/// The two tables the scenarios share.
pub fn schema() -> Schema {
    let mut builder = Schema::builder();
    {
        let t = builder.table("users");
        t.column("id", Type::Integer).primary_key().auto_increment();
        t.column("name", Type::Text).unique();
        t.column("age", Type::Integer).nullable();
    }
    {
        let t = builder.table("orders");
        t.column("id", Type::Integer).primary_key().auto_increment();
        t.column("user_id", Type::Integer).references("users", "id");
        t.column("total", Type::Double);
        t.index("orders_user", &["user_id"]);
    }
    builder.build().unwrap()
}

/// A datastore over a fresh in-memory database, with the schema created.
///
/// In-memory SQLite gives every connection its own database, so scenarios
/// must stick to the returned context; a second context would see an empty
/// database of its own.
pub async fn datastore() -> (Datastore, Context) {
    init_tracing();

    let ds = Datastore::builder()
        .schema(schema())
        .connection_source(Sqlite::in_memory())
        .dialect(SqliteDialect::new())
        .build()
        .await
        .unwrap();

    let cx = Context::new("test");
    ds.create_missing_tables(&cx).await.unwrap();
    (ds, cx)
}

/// Like [`datastore`], with every connection call recorded for assertions
/// on transaction traffic.
pub async fn recording_datastore() -> (Datastore, Context, recording::Ops) {
    init_tracing();

    let source = recording::RecordingSource::new(Sqlite::in_memory());
    let ops = source.ops();

    let ds = Datastore::builder()
        .schema(schema())
        .connection_source(source)
        .dialect(SqliteDialect::new())
        .build()
        .await
        .unwrap();

    let cx = Context::new("test");
    ds.create_missing_tables(&cx).await.unwrap();
    ops.lock().unwrap().clear();
    (ds, cx, ops)
}

/// Prints engine traffic when a scenario fails. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
