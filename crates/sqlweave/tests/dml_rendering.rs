use sqlweave::prelude::*;

fn person() -> (SqlTable, SqlColumn, SqlColumn, SqlColumn) {
    let table = SqlTable::new("person").with_schema("app");
    let id = table.column("id");
    let name = table.column("first_name");
    let age = table.column("age");
    (table, id, name, age)
}

#[test]
fn update_numbers_set_values_before_where() {
    let (person, id, name, age) = person();
    let start = update(&person);
    let filtered = start.where_(&id, is_equal_to(7));
    start.set(&name).equal_to("Barney").set(&age).equal_to_null();

    let rendered = filtered.build().unwrap().render(&NamedColon).unwrap();
    assert_eq!(
        rendered.sql,
        "update app.person set first_name = :p1, age = null where id = :p2"
    );
    assert_eq!(rendered.parameters.get("p1"), Some(&Value::from("Barney")));
    assert_eq!(rendered.parameters.get("p2"), Some(&Value::Int(7)));
}

#[test]
fn update_from_sub_select() {
    let (person, id, _name, age) = person();
    let oldest = select([Expr::col(&age).max()])
        .from(&person)
        .where_(&id, is_less_than(100))
        .build()
        .unwrap();
    let rendered = update(&person)
        .set(&age)
        .equal_to_select(oldest)
        .where_(&id, is_equal_to(3))
        .build()
        .unwrap()
        .render(&Dialect::Postgres)
        .unwrap();
    assert_eq!(
        rendered.sql,
        "update app.person set age = (select max(age) from app.person where id < $1) where id = $2"
    );
}

#[test]
fn delete_with_rerooted_where() {
    let (person, id, name, age) = person();
    let rendered = delete_from(&person)
        .where_(&id, is_equal_to_when_present(None::<i32>))
        .or(&name, is_like("B%"))
        .and(&age, is_not_between(10, 20))
        .build()
        .unwrap()
        .render(&NamedColon)
        .unwrap();
    assert_eq!(
        rendered.sql,
        "delete from app.person where first_name like :p1 and age not between :p2 and :p3"
    );
}

#[test]
fn insert_skips_absent_values() {
    let (person, id, name, age) = person();
    let nickname: Option<&str> = None;
    let rendered = insert_into(&person)
        .set(&id)
        .to_value(1)
        .set(&name)
        .to_string_constant("Wilma")
        .set(&age)
        .to_value_when_present(Some(40))
        .set(&person.column("nickname"))
        .to_value_when_present(nickname)
        .build()
        .unwrap()
        .render(&NamedColon)
        .unwrap();
    assert_eq!(
        rendered.sql,
        "insert into app.person (id, first_name, age) values (:p1, 'Wilma', :p2)"
    );
    assert_eq!(rendered.parameters.to_vec(), vec![Value::Int(1), Value::Int(40)]);
}

#[test]
fn dml_errors() {
    let (person, id, _name, _age) = person();
    let err = update(&person).build().unwrap().render(&NamedColon).unwrap_err();
    assert!(err.is_empty_group());

    let err = delete_from(&person)
        .where_(&id, is_in_when_present(Vec::<i32>::new()))
        .build()
        .unwrap()
        .render(&NamedColon)
        .unwrap_err();
    assert!(err.is_non_rendering_clause());

    let err = insert_into(&SqlTable::new("")).build().unwrap_err();
    assert!(err.is_missing_argument());
    assert!(err.to_string().starts_with("Build error"));
}
