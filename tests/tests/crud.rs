use quarry::stmt::{Expr, Func, OrderBy, Value};
use quarry::Cardinality;

use pretty_assertions::assert_eq;

#[tokio::test]
async fn insert_then_read_back() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let id = users.column_named("id").unwrap();
    let name = users.column_named("name").unwrap();

    let count = ds
        .exec(&cx, ds.insert(users).value(name, "John Doe"))
        .await
        .unwrap()
        .into_count()
        .unwrap();
    assert_eq!(count, 1);

    let rows = ds
        .query(&cx, ds.select([id, name]).from(users))
        .await
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value_of(id).unwrap(), &Value::I64(1));
    assert_eq!(rows[0].value_of(name).unwrap(), &Value::from("John Doe"));
}

#[tokio::test]
async fn like_matches_prefixes() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    for n in ["John Doe", "Jane Doe"] {
        ds.exec(&cx, ds.insert(users).value(name, n)).await.unwrap();
    }

    let row = ds
        .query(
            &cx,
            ds.select([name]).from(users).filter(name.like("John%")),
        )
        .await
        .unwrap()
        .one()
        .await
        .unwrap();

    assert_eq!(row.value_of(name).unwrap(), &Value::from("John Doe"));
}

#[tokio::test]
async fn one_requires_exactly_one_row() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    let err = ds
        .query(&cx, ds.select([name]).from(users))
        .await
        .unwrap()
        .one()
        .await
        .unwrap_err();
    assert!(err.is_cardinality());
    assert_eq!(err.cardinality(), Some(Cardinality::Zero));

    for n in ["John Doe", "Jane Doe"] {
        ds.exec(&cx, ds.insert(users).value(name, n)).await.unwrap();
    }

    let err = ds
        .query(&cx, ds.select([name]).from(users))
        .await
        .unwrap()
        .one()
        .await
        .unwrap_err();
    assert_eq!(err.cardinality(), Some(Cardinality::Many));
}

#[tokio::test]
async fn first_is_none_on_an_empty_result() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    let first = ds
        .query(&cx, ds.select([name]).from(users))
        .await
        .unwrap()
        .first()
        .await
        .unwrap();
    assert!(first.is_none());

    ds.exec(&cx, ds.insert(users).value(name, "John Doe"))
        .await
        .unwrap();

    let first = ds
        .query(&cx, ds.select([name]).from(users))
        .await
        .unwrap()
        .first()
        .await
        .unwrap();
    assert!(first.is_some());
}

#[tokio::test]
async fn update_rewrites_only_matching_rows() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();
    let age = users.column_named("age").unwrap();

    for (n, a) in [("John Doe", 40i64), ("Jane Doe", 41)] {
        ds.exec(&cx, ds.insert(users).value(name, n).value(age, a))
            .await
            .unwrap();
    }

    let count = ds
        .exec(
            &cx,
            ds.update(users).set(age, 30i64).filter(name.eq("John Doe")),
        )
        .await
        .unwrap()
        .into_count()
        .unwrap();
    assert_eq!(count, 1);

    let row = ds
        .query(
            &cx,
            ds.select([age]).from(users).filter(name.eq("John Doe")),
        )
        .await
        .unwrap()
        .one()
        .await
        .unwrap();
    assert_eq!(row.value_of(age).unwrap(), &Value::I64(30));

    let row = ds
        .query(
            &cx,
            ds.select([age]).from(users).filter(name.eq("Jane Doe")),
        )
        .await
        .unwrap()
        .one()
        .await
        .unwrap();
    assert_eq!(row.value_of(age).unwrap(), &Value::I64(41));
}

#[tokio::test]
async fn delete_removes_matching_rows() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    for n in ["John Doe", "Jane Doe"] {
        ds.exec(&cx, ds.insert(users).value(name, n)).await.unwrap();
    }

    let count = ds
        .exec(&cx, ds.delete(users).filter(name.eq("Jane Doe")))
        .await
        .unwrap()
        .into_count()
        .unwrap();
    assert_eq!(count, 1);

    let rows = ds
        .query(&cx, ds.select([name]).from(users))
        .await
        .unwrap()
        .collect()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value_of(name).unwrap(), &Value::from("John Doe"));
}

#[tokio::test]
async fn aggregates_come_back_by_function() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();
    let age = users.column_named("age").unwrap();

    for (n, a) in [("John Doe", 10i64), ("Jane Doe", 21)] {
        ds.exec(&cx, ds.insert(users).value(name, n).value(age, a))
            .await
            .unwrap();
    }

    let row = ds
        .query(
            &cx,
            ds.select([Expr::from(Func::count()), Expr::from(Func::avg(age))])
                .from(users),
        )
        .await
        .unwrap()
        .one()
        .await
        .unwrap();

    assert_eq!(row.func_value(&Func::count()).unwrap(), &Value::I64(2));
    // Aggregate values pass through without column coercion.
    assert_eq!(row.func_value(&Func::avg(age)).unwrap(), &Value::F64(15.5));
}

#[tokio::test]
async fn order_by_and_limit_shape_the_result() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    for n in ["alice", "bob", "carol"] {
        ds.exec(&cx, ds.insert(users).value(name, n)).await.unwrap();
    }

    let rows = ds
        .query(
            &cx,
            ds.select([name])
                .from(users)
                .order_by(OrderBy::desc(name))
                .limit(2),
        )
        .await
        .unwrap()
        .collect()
        .await
        .unwrap();

    let names: Vec<&Value> = rows.iter().map(|row| row.value_of(name).unwrap()).collect();
    assert_eq!(names, [&Value::from("carol"), &Value::from("bob")]);
}

#[tokio::test]
async fn null_round_trips_through_a_nullable_column() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();
    let age = users.column_named("age").unwrap();

    ds.exec(&cx, ds.insert(users).value(name, "John Doe"))
        .await
        .unwrap();
    ds.exec(&cx, ds.insert(users).value(name, "Jane Doe").value(age, 41i64))
        .await
        .unwrap();

    let row = ds
        .query(&cx, ds.select([name, age]).from(users).filter(age.is_null()))
        .await
        .unwrap()
        .one()
        .await
        .unwrap();

    assert_eq!(row.value_of(name).unwrap(), &Value::from("John Doe"));
    assert_eq!(row.value_of(age).unwrap(), &Value::Null);
}

#[tokio::test]
async fn an_absent_optional_compares_as_null() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();
    let age = users.column_named("age").unwrap();

    ds.exec(&cx, ds.insert(users).value(name, "John Doe"))
        .await
        .unwrap();

    let missing: Option<i64> = None;
    let row = ds
        .query(&cx, ds.select([name]).from(users).filter(age.eq(missing)))
        .await
        .unwrap()
        .one()
        .await
        .unwrap();
    assert_eq!(row.value_of(name).unwrap(), &Value::from("John Doe"));
}

#[tokio::test]
async fn a_write_reports_a_count_and_a_query_streams() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();

    let outcome = ds
        .exec(&cx, ds.insert(users).value(name, "John Doe"))
        .await
        .unwrap();
    assert!(outcome.is_count());

    let outcome = ds
        .exec(&cx, ds.select([name]).from(users))
        .await
        .unwrap();
    assert!(outcome.is_rows());
    assert!(outcome.into_count().is_err());
}

#[tokio::test]
async fn asking_for_a_missing_column_is_a_lookup_error() {
    let (ds, cx) = tests::datastore().await;
    let users = ds.schema().table_named("users").unwrap();
    let name = users.column_named("name").unwrap();
    let age = users.column_named("age").unwrap();

    ds.exec(&cx, ds.insert(users).value(name, "John Doe"))
        .await
        .unwrap();

    let row = ds
        .query(&cx, ds.select([name]).from(users))
        .await
        .unwrap()
        .one()
        .await
        .unwrap();

    let err = row.value_of(age).unwrap_err();
    assert!(err.is_lookup());
}
