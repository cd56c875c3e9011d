use serde_json::json;
use sqlweave::prelude::*;
use sqlweave::{Clause, TableExpr};

struct Person {
    table: SqlTable,
    id: SqlColumn,
    name: SqlColumn,
    age: SqlColumn,
    address_id: SqlColumn,
}

fn person() -> Person {
    let table = SqlTable::new("person");
    Person {
        id: table.column("id"),
        name: table.column("first_name"),
        age: table.column("age"),
        address_id: table.column("address_id"),
        table,
    }
}

fn render(model: &SelectModel) -> RenderedStatement {
    model.render(&NamedColon).expect("render select")
}

#[test]
fn in_list_round_trip() {
    let p = person();
    let model = select([&p.id, &p.name])
        .from(&p.table)
        .where_(&p.id, is_in([5, 8, 10]))
        .build()
        .unwrap();
    let rendered = render(&model);
    assert_eq!(
        rendered.sql,
        "select id, first_name from person where id in (:p1,:p2,:p3)"
    );
    assert_eq!(rendered.parameters.to_json(), json!({"p1": 5, "p2": 8, "p3": 10}));
}

#[test]
fn filtered_root_reroots_on_next_criterion() {
    let p = person();
    let rendered = render(
        &select([&p.id, &p.name])
            .from(&p.table)
            .where_(&p.id, is_equal_to_when_present(None::<i32>))
            .and(&p.name, is_equal_to("Fred"))
            .or(&p.age, is_greater_than(30))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select id, first_name from person where first_name = :p1 or age > :p2"
    );
    assert_eq!(rendered.parameters.get("p1"), Some(&Value::from("Fred")));
    assert_eq!(rendered.parameters.get("p2"), Some(&Value::Int(30)));
}

#[test]
fn filtered_middle_criterion_drops_its_connector() {
    let p = person();
    let rendered = render(
        &select([&p.id])
            .from(&p.table)
            .where_(&p.id, is_equal_to(1))
            .and(&p.name, is_like_when_present(None::<&str>))
            .or(&p.age, is_greater_than(30))
            .build()
            .unwrap(),
    );
    assert_eq!(rendered.sql, "select id from person where id = :p1 or age > :p2");
}

#[test]
fn where_rendering_nothing_is_an_error_unless_allowed() {
    let p = person();
    let builder = select([&p.id])
        .from(&p.table)
        .where_(&p.id, is_equal_to_when_present(None::<i32>))
        .and(&p.name, is_in_when_present(Vec::<String>::new()));

    let err = builder.build().unwrap().render(&NamedColon).unwrap_err();
    assert!(err.is_non_rendering_clause());
    assert_eq!(err.clause(), Some(Clause::Where));

    let allowed = builder
        .configure(|config| config.non_rendering_where_allowed = true)
        .build()
        .unwrap();
    assert_eq!(render(&allowed).sql, "select id from person");
}

#[test]
fn groups_and_leaf_sub_criteria_parenthesize() {
    let p = person();
    let rendered = render(
        &select([&p.id])
            .from(&p.table)
            .where_criterion(criterion(&p.id, is_equal_to(1)).or((&p.id, is_equal_to(2))))
            .and_criterion(
                group(criterion(&p.name, is_like_when_present(None::<&str>)))
                    .or((&p.age, is_less_than(20))),
            )
            .and_criterion(group(criterion(&p.name, is_equal_to_when_present(None::<&str>))))
            .and_criterion(not(group(criterion(&p.age, is_null())).or((&p.age, is_greater_than(90)))))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select id from person where (id = :p1 or id = :p2) and (age < :p3) and not (age is null or age > :p4)"
    );
    assert_eq!(rendered.parameters.len(), 4);
}

#[test]
fn leaf_whose_own_condition_is_filtered_keeps_its_sub_criteria() {
    let p = person();
    let rendered = render(
        &select([&p.id])
            .from(&p.table)
            .where_criterion(
                criterion(&p.id, is_equal_to_when_present(None::<i32>))
                    .and((&p.age, is_greater_than(3)))
                    .or((&p.age, is_less_than(1))),
            )
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select id from person where (age > :p1 or age < :p2)"
    );
}

#[test]
fn empty_in_list_renders_verbatim_but_when_present_drops_it() {
    let p = person();
    let strict = render(
        &select([&p.id])
            .from(&p.table)
            .where_(&p.id, is_in(Vec::<i32>::new()))
            .build()
            .unwrap(),
    );
    assert_eq!(strict.sql, "select id from person where id in ()");
    assert!(strict.parameters.is_empty());

    let lenient = render(
        &select([&p.id])
            .from(&p.table)
            .where_(&p.id, is_in_when_present(Vec::<i32>::new()))
            .and(&p.age, is_not_null())
            .build()
            .unwrap(),
    );
    assert_eq!(lenient.sql, "select id from person where age is not null");
}

#[test]
fn in_when_present_drops_null_elements() {
    let p = person();
    let rendered = render(
        &select([&p.id])
            .from(&p.table)
            .where_(&p.id, is_not_in_when_present([Some(1), None, Some(3)]))
            .build()
            .unwrap(),
    );
    assert_eq!(rendered.sql, "select id from person where id not in (:p1,:p2)");
    assert_eq!(rendered.parameters.to_vec(), vec![Value::Int(1), Value::Int(3)]);
}

#[test]
fn mapped_and_filtered_conditions() {
    let p = person();
    let rendered = render(
        &select([&p.id])
            .from(&p.table)
            .where_(
                &p.name,
                is_like("fred").map(|v| match v {
                    Value::Text(s) => Value::Text(format!("%{s}%")),
                    other => other,
                }),
            )
            .and(&p.age, is_between(10, 20).filter(|v| v.as_i64() != Some(0)))
            .and(&p.id, is_in([1, 2, 3, 4]).filter(|v| v.as_i64().is_some_and(|n| n % 2 == 0)))
            .and(&p.age, is_equal_to(7).filter_when(false))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select id from person where first_name like :p1 and age between :p2 and :p3 and id in (:p4,:p5)"
    );
    assert_eq!(rendered.parameters.get("p1"), Some(&Value::from("%fred%")));
    assert_eq!(rendered.parameters.get("p5"), Some(&Value::Int(4)));
}

#[test]
fn case_insensitive_like_upper_cases_both_sides() {
    let p = person();
    let rendered = render(
        &select([&p.id])
            .from(&p.table)
            .where_(&p.name, is_like_case_insensitive("%fred%"))
            .build()
            .unwrap(),
    );
    assert_eq!(rendered.sql, "select id from person where upper(first_name) like :p1");
    assert_eq!(rendered.parameters.get("p1"), Some(&Value::from("%FRED%")));
}

#[test]
fn join_forces_qualification_of_every_column() {
    let p = person();
    let address = SqlTable::new("address");
    let address_pk = address.column("id");
    let street = address.column("street");

    let rendered = render(
        &select([&p.id, &p.name, &street])
            .from(p.table.aliased("p"))
            .join(&address, on(&p.address_id, equal_to(&address_pk)))
            .where_(&p.id, is_equal_to(4))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select p.id, p.first_name, address.street from person p join address on p.address_id = address.id where p.id = :p1"
    );
}

#[test]
fn join_without_aliases_qualifies_with_table_names() {
    let p = person();
    let address = SqlTable::new("address");
    let address_pk = address.column("id");

    let rendered = render(
        &select([&p.id])
            .from(&p.table)
            .left_join(
                &address,
                on(&p.address_id, equal_to(&address_pk)).and(&address_pk, is_greater_than(0)),
            )
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select person.id from person left join address on person.address_id = address.id and address.id > :p1"
    );
}

#[test]
fn alias_without_join_qualifies_only_aliased_tables() {
    let p = person();
    let unaliased = render(&select([&p.id]).from(&p.table).build().unwrap());
    assert_eq!(unaliased.sql, "select id from person");

    let aliased = render(
        &select([&p.id])
            .from(p.table.aliased("p"))
            .where_(&p.id, is_equal_to(1))
            .build()
            .unwrap(),
    );
    assert_eq!(aliased.sql, "select p.id from person p where p.id = :p1");

    let explicit = render(
        &select([p.id.qualified_with("x")])
            .from(&p.table)
            .build()
            .unwrap(),
    );
    assert_eq!(explicit.sql, "select x.id from person");
}

#[test]
fn parameters_follow_sql_order_not_call_order() {
    let p = person();
    let start = select([&p.id, &p.name]).from(&p.table);
    let paged = start.limit(10).offset(20);
    start
        .where_(&p.id, is_greater_than(5))
        .and(&p.name, is_equal_to("Fred"))
        .order_by([p.id.desc()]);

    let rendered = render(&paged.build().unwrap());
    assert_eq!(
        rendered.sql,
        "select id, first_name from person where id > :p1 and first_name = :p2 order by id desc limit :p3 offset :p4"
    );
    let keys: Vec<String> = rendered.parameters.keys().map(|key| key.name()).collect();
    assert_eq!(keys, ["p1", "p2", "p3", "p4"]);
    assert_eq!(rendered.parameters.get("p3"), Some(&Value::BigInt(10)));
    assert_eq!(rendered.parameters.get("p4"), Some(&Value::BigInt(20)));
}

#[test]
fn offset_fetch_first_paging() {
    let p = person();
    let both = render(
        &select([&p.id])
            .from(&p.table)
            .offset(5)
            .fetch_first(10)
            .build()
            .unwrap(),
    );
    assert_eq!(
        both.sql,
        "select id from person offset :p1 rows fetch first :p2 rows only"
    );

    let fetch_only = render(&select([&p.id]).from(&p.table).fetch_first(3).build().unwrap());
    assert_eq!(fetch_only.sql, "select id from person fetch first :p1 rows only");

    let absent = render(
        &select([&p.id])
            .from(&p.table)
            .limit_when_present(None)
            .offset_when_present(None)
            .build()
            .unwrap(),
    );
    assert_eq!(absent.sql, "select id from person");
}

#[test]
fn build_from_any_point_in_the_chain() {
    let p = person();
    let b1 = select([&p.id, &p.name]).from(&p.table);
    let b2 = b1.where_(&p.id, is_greater_than(3));
    let b3 = b2.order_by([&p.name]);

    let m1 = b1.build().unwrap();
    let m2 = b2.build().unwrap();
    let m3 = b3.build().unwrap();
    assert_eq!(m1, m3);
    assert_eq!(m2, m3);
    assert_eq!(
        render(&m1).sql,
        "select id, first_name from person where id > :p1 order by first_name"
    );
}

#[test]
fn union_and_union_all_share_numbering() {
    let p = person();
    let rendered = render(
        &select([&p.id])
            .from(&p.table)
            .where_(&p.id, is_less_than(3))
            .union()
            .select([&p.id])
            .from(&p.table)
            .where_(&p.id, is_greater_than(8))
            .union_all()
            .select_distinct([&p.id])
            .from(&p.table)
            .where_(&p.age, is_equal_to(40))
            .order_by([&p.id])
            .limit(5)
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select id from person where id < :p1 union select id from person where id > :p2 \
         union all select distinct id from person where age = :p3 order by id limit :p4"
    );
}

#[test]
fn sub_query_in_where_shares_the_parameter_sequence() {
    let p = person();
    let address = SqlTable::new("address");
    let address_pk = address.column("id");
    let street = address.column("street");

    let inner = select([&address_pk])
        .from(&address)
        .where_(&street, is_like("%Main%"))
        .build()
        .unwrap();
    let rendered = render(
        &select([&p.id, &p.name])
            .from(&p.table)
            .where_(&p.name, is_equal_to("Fred"))
            .and(&p.address_id, is_in_select(inner))
            .and(&p.id, is_less_than(100))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select id, first_name from person where first_name = :p1 and address_id in \
         (select id from address where street like :p2) and id < :p3"
    );
    assert_eq!(rendered.parameters.get("p2"), Some(&Value::from("%Main%")));
}

#[test]
fn sub_query_as_table_expression() {
    let p = person();
    let inner = select([&p.id, &p.name])
        .from(&p.table)
        .where_(&p.id, is_greater_than(10))
        .build()
        .unwrap();
    let outer_id = SqlColumn::new("id").qualified_with("t");
    let rendered = render(
        &select([&outer_id])
            .from(TableExpr::subquery(inner).aliased("t"))
            .where_(&outer_id, is_less_than(50))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select t.id from (select id, first_name from person where id > :p1) t where t.id < :p2"
    );
}

#[test]
fn correlated_exists_sees_outer_aliases() {
    let p = person();
    let address = SqlTable::new("address");
    let address_pk = address.column("id");

    let inner = select([&address_pk])
        .from(address.aliased("a"))
        .where_(&address_pk, equal_to(&p.address_id))
        .build()
        .unwrap();
    let rendered = render(
        &select([&p.id])
            .from(p.table.aliased("p"))
            .where_criterion(exists(inner))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select p.id from person p where exists (select a.id from address a where a.id = p.address_id)"
    );
}

#[test]
fn self_join_gives_each_side_its_own_alias() {
    let child = SqlTable::new("person");
    let parent = SqlTable::new("person");
    let child_id = child.column("id");
    let child_parent = child.column("parent_id");
    let parent_id = parent.column("id");

    let rendered = render(
        &select([&child_id, &parent_id])
            .from(child.aliased("c"))
            .join(parent.aliased("p"), on(&child_parent, equal_to(&parent_id)))
            .where_(&parent_id, is_equal_to(7))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select c.id, p.id from person c join person p on c.parent_id = p.id where p.id = :p1"
    );
}

#[test]
fn correlated_exists_over_the_same_table() {
    let employee = SqlTable::new("person");
    let manager = SqlTable::new("person");
    let employee_id = employee.column("id");
    let manager_ref = employee.column("manager_id");
    let manager_id = manager.column("id");

    let inner = select([&manager_id])
        .from(manager.aliased("m"))
        .where_(&manager_id, equal_to(&manager_ref))
        .build()
        .unwrap();
    let rendered = render(
        &select([&employee_id])
            .from(employee.aliased("e"))
            .where_criterion(exists(inner))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select e.id from person e where exists (select m.id from person m where m.id = e.manager_id)"
    );
}

#[test]
fn not_exists_with_unaliased_inner_table() {
    let employee = SqlTable::new("person");
    let report = SqlTable::new("person");
    let employee_id = employee.column("id");
    let report_manager = report.column("manager_id");

    let inner = select([report.column("id")])
        .from(&report)
        .where_(&report_manager, equal_to(&employee_id))
        .and(report.column("age"), is_less_than(30))
        .build()
        .unwrap();
    let rendered = render(
        &select([&employee_id])
            .from(employee.aliased("e"))
            .where_criterion(not_exists(inner))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select e.id from person e where not exists (select id from person where manager_id = e.id and age < :p1)"
    );
    assert_eq!(rendered.parameters.get("p1"), Some(&Value::Int(30)));
}

#[test]
fn join_on_rendering_nothing_is_an_error() {
    let p = person();
    let address = SqlTable::new("address");
    let address_pk = address.column("id");

    let model = select([&p.id])
        .from(p.table.aliased("p"))
        .join(
            address.aliased("a"),
            on(&address_pk, is_equal_to_when_present(None::<i32>)),
        )
        .build()
        .unwrap();
    let err = model.render(&NamedColon).unwrap_err();
    assert!(err.is_non_rendering_clause());
    assert_eq!(err.clause(), Some(Clause::JoinOn));
    assert_eq!(
        err.to_string(),
        "Render error: the join on clause rendered nothing and non-rendering join on clauses are not allowed"
    );
}

#[test]
fn case_with_every_arm_filtered_is_an_error() {
    let p = person();
    let category = search_case()
        .when(&p.age, is_less_than_when_present(None::<i32>))
        .then_string("minor")
        .else_string("adult")
        .end()
        .unwrap();
    let model = select([Expr::col(&p.id), category.aliased("category")])
        .from(&p.table)
        .build()
        .unwrap();
    let err = model.render(&NamedColon).unwrap_err();
    assert!(err.is_empty_group());
    assert_eq!(err.clause(), Some(Clause::Case));
    assert_eq!(
        err.to_string(),
        "Render error: the case clause has no entries to render"
    );
}

#[test]
fn conflicting_or_oversized_paging_fails_to_build() {
    let p = person();
    let query = select([&p.id]).from(&p.table);
    let _standard = query.offset(5).fetch_first(10);
    let err = query.limit(3).build().unwrap_err();
    assert!(err.is_invalid_argument());

    let err = select([&p.id])
        .from(&p.table)
        .offset(u64::MAX)
        .build()
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(
        err.to_string(),
        "Build error: offset 18446744073709551615 exceeds the BIGINT range"
    );
}

#[test]
fn group_by_and_having() {
    let p = person();
    let count = Expr::count_star().aliased("total");
    let rendered = render(
        &select([Expr::col(&p.age), count])
            .from(&p.table)
            .where_(&p.id, is_greater_than(0))
            .group_by([&p.age])
            .having(Expr::count_star(), is_greater_than(2))
            .order_by([OrderBy::desc(Expr::count_star().aliased("total"))])
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select age, count(*) as total from person where id > :p1 group by age having count(*) > :p2 order by total desc"
    );
}

#[test]
fn having_rendering_nothing_follows_configuration() {
    let p = person();
    let builder = select([&p.age])
        .from(&p.table)
        .group_by([&p.age])
        .having(Expr::count_star(), is_greater_than_when_present(None::<i64>));
    let err = builder.build().unwrap().render(&NamedColon).unwrap_err();
    assert_eq!(err.clause(), Some(Clause::Having));

    let model = builder
        .with_configuration(StatementConfiguration::new().non_rendering_having_allowed(true))
        .build()
        .unwrap();
    assert_eq!(render(&model).sql, "select age from person group by age");
}

#[test]
fn searched_case_numbers_through_the_shared_sequence() {
    let p = person();
    let category = search_case()
        .when(&p.age, is_less_than(18))
        .then_string("minor")
        .when(&p.age, is_greater_than_when_present(None::<i32>))
        .then_string("unreachable")
        .else_string("adult")
        .end()
        .unwrap();
    let rendered = render(
        &select([Expr::col(&p.id), category.aliased("category")])
            .from(&p.table)
            .where_(&p.id, is_greater_than(1))
            .build()
            .unwrap(),
    );
    assert_eq!(
        rendered.sql,
        "select id, case when age < :p1 then 'minor' else 'adult' end as category from person where id > :p2"
    );
}

#[test]
fn simple_case_with_values_and_conditions() {
    let p = person();
    let grade = simple_case(&p.age)
        .when_values([1, 2])
        .then_string("infant")
        .when_conditions([is_greater_than(64)])
        .then_string("senior")
        .else_constant("null")
        .end()
        .unwrap();
    let rendered = render(&select([grade.aliased("grade")]).from(&p.table).build().unwrap());
    assert_eq!(
        rendered.sql,
        "select case age when :p1, :p2 then 'infant' when > :p3 then 'senior' else null end as grade from person"
    );
}

#[test]
fn rendering_twice_is_identical() {
    let p = person();
    let model = select([&p.id])
        .from(&p.table)
        .where_(&p.id, is_in([1, 2]))
        .limit(3)
        .build()
        .unwrap();
    assert_eq!(render(&model), render(&model));
}

#[test]
fn models_render_concurrently() {
    let p = person();
    let model = select([&p.id])
        .from(&p.table)
        .where_(&p.name, is_equal_to("Fred"))
        .build()
        .unwrap();
    let expected = render(&model);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| model.render(&NamedColon).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn placeholder_strategies_differ_only_in_placeholder_text() {
    let p = person();
    let typed_id = p.id.clone().with_type(SqlType::Integer);
    let model = select([&p.id])
        .from(&p.table)
        .where_(&typed_id, is_equal_to(1))
        .and(&p.name, is_equal_to("Fred"))
        .build()
        .unwrap();

    let postgres = model.render(&Dialect::Postgres).unwrap();
    assert_eq!(postgres.sql, "select id from person where id = $1 and first_name = $2");
    let sqlite = model.render(&Dialect::Sqlite).unwrap();
    assert_eq!(sqlite.sql, "select id from person where id = ?1 and first_name = ?2");
    let mysql = model.render(&Dialect::Mysql).unwrap();
    assert_eq!(mysql.sql, "select id from person where id = ? and first_name = ?");
    let templated = model.render(&Templated::default()).unwrap();
    assert_eq!(
        templated.sql,
        "select id from person where id = #{parameters.p1,jdbcType=INTEGER} and first_name = #{parameters.p2}"
    );
    assert_eq!(postgres.parameters, templated.parameters);
}

#[test]
fn build_errors() {
    let p = person();
    let err = select(Vec::<Expr>::new()).from(&p.table).build().unwrap_err();
    assert!(err.is_empty_group());

    let err = select([&p.id]).from(SqlTable::new("")).build().unwrap_err();
    assert!(err.is_missing_argument());

    let err = select([&p.id])
        .from(&p.table)
        .order_by(Vec::<OrderBy>::new())
        .build()
        .unwrap_err();
    assert!(err.is_empty_group());

    let base = select([&p.id]).from(&p.table);
    let _dangling = base.union().select([&p.id]);
    assert!(base.build().unwrap_err().is_missing_argument());

    assert!(search_case().end().unwrap_err().is_empty_group());
    assert!(group_of(Vec::new()).unwrap_err().is_empty_group());
}
