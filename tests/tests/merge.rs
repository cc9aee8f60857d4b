use quarry::stmt::{Expr, Func, Value};

use pretty_assertions::assert_eq;

#[tokio::test]
async fn merge_inserts_when_the_key_is_absent() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();
    let age = users.column_named("age").unwrap();

    let count = ds
        .exec(
            &cx,
            ds.merge(users, name).value(name, "John Doe").value(age, 21i64),
        )
        .await
        .unwrap()
        .into_count()
        .unwrap();
    assert_eq!(count, 1);

    let row = ds
        .query(&cx, ds.select([name, age]).from(users))
        .await
        .unwrap()
        .one()
        .await
        .unwrap();
    assert_eq!(row.value_of(name).unwrap(), &Value::from("John Doe"));
    assert_eq!(row.value_of(age).unwrap(), &Value::I64(21));
}

#[tokio::test]
async fn merge_updates_in_place_when_the_key_matches() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();
    let age = users.column_named("age").unwrap();

    for a in [21i64, 25] {
        ds.exec(
            &cx,
            ds.merge(users, name).value(name, "John Doe").value(age, a),
        )
        .await
        .unwrap();
    }

    // The second merge rewrote the row rather than adding one.
    let row = ds
        .query(
            &cx,
            ds.select([Expr::from(Func::count()), Expr::from(age)]).from(users),
        )
        .await
        .unwrap()
        .one()
        .await
        .unwrap();
    assert_eq!(row.func_value(&Func::count()).unwrap(), &Value::I64(1));
    assert_eq!(row.value_of(age).unwrap(), &Value::I64(25));
}
