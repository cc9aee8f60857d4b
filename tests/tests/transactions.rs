use quarry::stmt::{Expr, Func, Value};
use quarry::{Context, Datastore, Error};

use tests::recording::Op;

use pretty_assertions::assert_eq;

async fn user_count(ds: &Datastore, cx: &Context) -> i64 {
    let users = ds.schema().table_named("users").unwrap();
    let row = ds
        .query(cx, ds.select([Expr::from(Func::count())]).from(users))
        .await
        .unwrap()
        .one()
        .await
        .unwrap();
    row.func_value(&Func::count()).unwrap().as_i64().unwrap()
}

/// The recorded traffic with statement executions stripped, leaving only the
/// transaction control calls.
fn control_ops(ops: &tests::recording::Ops) -> Vec<Op> {
    ops.lock()
        .unwrap()
        .iter()
        .filter(|op| !matches!(op, Op::Exec(_)))
        .cloned()
        .collect()
}

#[tokio::test]
async fn a_committed_transaction_persists() {
    let (ds, cx, ops) = tests::recording_datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    let count = ds
        .transaction(&cx, async |ds: &Datastore| {
            ds.exec(&cx, ds.insert(users).value(name, "John Doe"))
                .await?
                .into_count()
        })
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(user_count(&ds, &cx).await, 1);

    assert_eq!(
        control_ops(&ops),
        [Op::SetAutocommit(false), Op::Commit, Op::SetAutocommit(true)]
    );
}

#[tokio::test]
async fn nested_scopes_commit_once_at_the_root() {
    let (ds, cx, ops) = tests::recording_datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    ds.transaction(&cx, async |ds: &Datastore| {
        ds.exec(&cx, ds.insert(users).value(name, "outer")).await?;

        ds.transaction(&cx, async |ds: &Datastore| {
            ds.exec(&cx, ds.insert(users).value(name, "middle")).await?;

            ds.transaction(&cx, async |ds: &Datastore| {
                ds.exec(&cx, ds.insert(users).value(name, "inner")).await?;
                Ok(())
            })
            .await
        })
        .await
    })
    .await
    .unwrap();

    assert_eq!(user_count(&ds, &cx).await, 3);

    // One BEGIN, one COMMIT, one autocommit restore for the whole nest.
    assert_eq!(
        control_ops(&ops),
        [Op::SetAutocommit(false), Op::Commit, Op::SetAutocommit(true)]
    );
}

#[tokio::test]
async fn a_nested_failure_rolls_back_once_at_the_root() {
    let (ds, cx, ops) = tests::recording_datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    let err = ds
        .transaction(&cx, async |ds: &Datastore| {
            ds.exec(&cx, ds.insert(users).value(name, "outer")).await?;

            ds.transaction(&cx, async |ds: &Datastore| {
                ds.exec(&cx, ds.insert(users).value(name, "middle")).await?;

                ds.transaction(&cx, async |ds: &Datastore| {
                    ds.exec(&cx, ds.insert(users).value(name, "inner")).await?;
                    Err::<(), _>(Error::configuration("boom"))
                })
                .await
            })
            .await
        })
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    // No scope committed on its own; the root rolled everything back.
    assert_eq!(user_count(&ds, &cx).await, 0);
    assert_eq!(
        control_ops(&ops),
        [
            Op::SetAutocommit(false),
            Op::Rollback,
            Op::SetAutocommit(true)
        ]
    );
}

#[tokio::test]
async fn the_session_survives_a_rollback() {
    let (ds, cx, _ops) = tests::recording_datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    let err = ds
        .transaction(&cx, async |ds: &Datastore| {
            ds.exec(&cx, ds.insert(users).value(name, "John Doe"))
                .await?;
            Err::<(), _>(Error::configuration("boom"))
        })
        .await
        .unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(user_count(&ds, &cx).await, 0);

    ds.exec(&cx, ds.insert(users).value(name, "Jane Doe"))
        .await
        .unwrap();
    assert_eq!(user_count(&ds, &cx).await, 1);
}

#[tokio::test]
async fn sibling_scopes_get_their_own_transactions() {
    let (ds, cx, ops) = tests::recording_datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    let err = ds
        .transaction(&cx, async |ds: &Datastore| {
            ds.exec(&cx, ds.insert(users).value(name, "John Doe"))
                .await?;
            Err::<(), _>(Error::configuration("boom"))
        })
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    ds.transaction(&cx, async |ds: &Datastore| {
        ds.exec(&cx, ds.insert(users).value(name, "Jane Doe"))
            .await?;
        Ok(())
    })
    .await
    .unwrap();

    // The first scope's rollback did not leak into the second.
    assert_eq!(user_count(&ds, &cx).await, 1);
    assert_eq!(
        control_ops(&ops),
        [
            Op::SetAutocommit(false),
            Op::Rollback,
            Op::SetAutocommit(true),
            Op::SetAutocommit(false),
            Op::Commit,
            Op::SetAutocommit(true)
        ]
    );
}

#[tokio::test]
async fn writes_inside_an_open_transaction_are_invisible_after_rollback() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();
    let age = users.column_named("age").unwrap();

    let err = ds
        .transaction(&cx, async |ds: &Datastore| {
            ds.exec(&cx, ds.insert(users).value(name, "John Doe").value(age, 40i64))
                .await?;
            ds.exec(&cx, ds.update(users).set(age, 41i64).filter(name.eq("John Doe")))
                .await?;

            // The scope sees its own writes before the unwind.
            let row = ds
                .query(&cx, ds.select([age]).from(users))
                .await?
                .one()
                .await?;
            assert_eq!(row.value_of(age)?, &Value::I64(41));

            Err::<(), _>(Error::configuration("boom"))
        })
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    assert_eq!(user_count(&ds, &cx).await, 0);
}
