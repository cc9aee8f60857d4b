use quarry::{Context, Datastore};
use quarry_driver_sqlite::{Sqlite, SqliteDialect};

use tests::recording::Op;

use std::time::Duration;

/// A datastore whose idle sweeper runs on a short clock.
async fn short_lived_datastore() -> (Datastore, Context) {
    tests::init_tracing();

    let ds = Datastore::builder()
        .schema(tests::schema())
        .connection_source(Sqlite::in_memory())
        .dialect(SqliteDialect::new())
        .session_timeout(Duration::from_secs(5))
        .sweep_interval(Duration::from_secs(1))
        .build()
        .await
        .unwrap();

    let cx = Context::new("test");
    ds.create_missing_tables(&cx).await.unwrap();
    (ds, cx)
}

#[tokio::test]
async fn contexts_are_isolated() {
    let (ds, cx) = tests::datastore().await;

    // In-memory SQLite hands every connection its own database, so another
    // context's session cannot see the tables created under the first.
    assert!(ds.table_exists(&cx, "users").await.unwrap());

    let other = Context::new("other");
    assert!(!ds.table_exists(&other, "users").await.unwrap());
}

#[tokio::test]
async fn disposing_a_context_closes_its_session() {
    let (ds, cx, ops) = tests::recording_datastore().await;

    assert!(ds.table_exists(&cx, "users").await.unwrap());

    ds.dispose(&cx).await;
    assert!(ops.lock().unwrap().contains(&Op::Close));

    // The next call under the same context gets a fresh session, which for
    // an in-memory database means a fresh, empty database.
    assert!(!ds.table_exists(&cx, "users").await.unwrap());
}

#[tokio::test]
async fn disposing_an_unknown_context_is_a_no_op() {
    let (ds, _cx) = tests::datastore().await;
    ds.dispose(&Context::new("ghost")).await;
}

#[tokio::test(start_paused = true)]
async fn idle_sessions_are_swept() {
    let (ds, cx) = short_lived_datastore().await;

    assert!(ds.table_exists(&cx, "users").await.unwrap());

    tokio::time::sleep(Duration::from_secs(6)).await;

    // The session sat idle past the timeout; its replacement connects to a
    // fresh database without the tables.
    assert!(!ds.table_exists(&cx, "users").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn an_open_cursor_keeps_the_session_alive() {
    let (ds, cx) = short_lived_datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    ds.exec(&cx, ds.insert(users).value(name, "John Doe"))
        .await
        .unwrap();

    let cursor = ds
        .query(&cx, ds.select([name]).from(users))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(60)).await;

    // An open cursor marks the session active, so the sweeper left it be.
    assert!(ds.table_exists(&cx, "users").await.unwrap());

    drop(cursor);
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(!ds.table_exists(&cx, "users").await.unwrap());
}

#[tokio::test]
async fn repeated_calls_reuse_the_session() {
    let (ds, cx, ops) = tests::recording_datastore().await;

    for _ in 0..3 {
        assert!(ds.table_exists(&cx, "users").await.unwrap());
    }

    // Three catalog queries, no reconnects or closes in between.
    let ops = ops.lock().unwrap();
    assert_eq!(ops.len(), 3);
    assert!(ops.iter().all(|op| matches!(op, Op::Exec(_))));
}

#[tokio::test]
async fn shutdown_closes_every_session() {
    let (ds, cx, ops) = tests::recording_datastore().await;

    assert!(ds.table_exists(&cx, "users").await.unwrap());
    let other = Context::new("other");
    ds.table_exists(&other, "users").await.unwrap();

    ds.shutdown().await;

    let ops = ops.lock().unwrap();
    let closes = ops.iter().filter(|op| **op == Op::Close).count();
    assert_eq!(closes, 2);
}
