use joinery::prelude::*;

use common::{Order, Person};

mod common;

#[test]
fn select_with_filter_order_and_page() {
    let statement = select::<Person>()
        .filter(Person::AGE.ge(18))
        .filter(Person::COUNTRY.eq("US"))
        .order_by(Person::NAME, OrderBy::Asc)
        .limit(10)
        .offset(20)
        .render(Dialect::Postgres)
        .unwrap();

    assert_eq!(
        statement.sql,
        r#"SELECT "Id", "Age", "Name", "Country", "Active", "Score" FROM "Person" WHERE "Age" >= @Age0 AND "Country" = @Country1 ORDER BY "Name" ASC LIMIT 10 OFFSET 20"#
    );
    assert_eq!(statement.params.names().collect::<Vec<_>>(), ["Age0", "Country1"]);
}

#[test]
fn sql_server_paging() {
    let top = select::<Order>().limit(5).render(Dialect::SqlServer).unwrap();
    assert_eq!(
        top.sql,
        "SELECT TOP (5) [Id], [CustomerId], [Total], [Status], [Placed] FROM [Order]"
    );

    let paged = select::<Order>()
        .limit(5)
        .offset(10)
        .render(Dialect::SqlServer)
        .unwrap();
    assert!(
        paged
            .sql
            .ends_with("FROM [Order] ORDER BY (SELECT NULL) OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"),
        "{}",
        paged.sql
    );
}

#[test]
fn count_uses_the_same_where() {
    let statement = count::<Order>()
        .filter(Order::STATUS.is_in(["open", "held"]))
        .render(Dialect::MySql)
        .unwrap();
    assert_eq!(
        statement.sql,
        "SELECT COUNT(*) FROM `Order` WHERE `Status` IN (@Status0, @Status1)"
    );
}

#[test]
fn insert_binds_every_column() {
    let person = Person {
        id: 1,
        age: 36,
        name: "Ada".into(),
        country: "UK".into(),
        active: true,
        score: None,
    };
    let statement = insert(person).render(Dialect::Oracle).unwrap();
    assert_eq!(
        statement.sql,
        r#"INSERT INTO "Person" ("Id", "Age", "Name", "Country", "Active", "Score") VALUES (:Id0, :Age1, :Name2, :Country3, :Active4, :Score5)"#
    );
    assert_eq!(statement.params.get("Score5"), Some(&Value::Null));
}

#[test]
fn update_numbers_set_before_where() {
    let statement = update::<Person>()
        .set(Person::AGE, 37)
        .set(Person::COUNTRY, "FR")
        .filter(Person::ID.eq(1))
        .render(Dialect::SqlServer)
        .unwrap();
    assert_eq!(
        statement.sql,
        "UPDATE [Person] SET [Age] = @Age0, [Country] = @Country1 WHERE [Id] = @Id2"
    );
}

#[test]
fn update_without_set_is_rejected() {
    let err = update::<Person>()
        .filter(Person::ID.eq(1))
        .render(Dialect::Postgres)
        .unwrap_err();
    assert!(matches!(err, JoineryError::InvalidStatement(_)));
}

#[test]
fn delete_with_negated_filter() {
    let statement = delete::<Order>()
        .filter(!Order::STATUS.contains("keep"))
        .render(Dialect::SqlLite)
        .unwrap();
    assert_eq!(statement.sql, r#"DELETE FROM "Order" WHERE "Status" NOT LIKE @Status0"#);
    assert_eq!(statement.params.get("Status0"), Some(&Value::String("%keep%".into())));
}
