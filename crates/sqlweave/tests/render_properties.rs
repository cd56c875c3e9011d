use proptest::prelude::*;
use sqlweave::prelude::*;

/// One WHERE entry: an optional value and whether it is OR-ed onto the chain.
fn entries() -> impl Strategy<Value = Vec<(Option<i32>, bool)>> {
    proptest::collection::vec((proptest::option::of(any::<i32>()), any::<bool>()), 1..8)
}

fn build(entries: &[(Option<i32>, bool)]) -> SelectModel {
    let table = SqlTable::new("t");
    let columns: Vec<SqlColumn> = (0..entries.len())
        .map(|i| table.column(format!("c{i}")))
        .collect();
    let mut chain = select([&columns[0]])
        .from(&table)
        .where_(&columns[0], is_equal_to_when_present(entries[0].0));
    for (column, (value, use_or)) in columns.iter().zip(entries).skip(1) {
        let condition = is_equal_to_when_present(*value);
        chain = if *use_or {
            chain.or(column, condition)
        } else {
            chain.and(column, condition)
        };
    }
    chain
        .configure(|config| config.non_rendering_where_allowed = true)
        .build()
        .expect("build")
}

proptest! {
    #[test]
    fn where_chain_reroots_and_numbers_without_gaps(entries in entries()) {
        let rendered = build(&entries).render(&NamedColon).expect("render");

        let mut expected = String::new();
        let mut values = Vec::new();
        for (i, (value, use_or)) in entries.iter().enumerate() {
            let Some(value) = value else { continue };
            if !values.is_empty() {
                expected.push_str(if *use_or { " or " } else { " and " });
            }
            values.push(Value::Int(*value));
            expected.push_str(&format!("c{i} = :p{}", values.len()));
        }
        let expected = if values.is_empty() {
            "select c0 from t".to_string()
        } else {
            format!("select c0 from t where {expected}")
        };

        prop_assert_eq!(rendered.sql, expected);
        prop_assert_eq!(rendered.parameters.to_vec(), values);
        let indexes: Vec<u32> = rendered.parameters.keys().map(|key| key.index()).collect();
        let sequential: Vec<u32> = (1..=indexes.len() as u32).collect();
        prop_assert_eq!(indexes, sequential);
    }

    #[test]
    fn rendering_is_idempotent(entries in entries(), limit in proptest::option::of(0u64..1000)) {
        let table = SqlTable::new("t");
        let id = table.column("id");
        let values: Vec<Option<i32>> = entries.iter().map(|(value, _)| *value).collect();
        let model = select([&id])
            .from(&table)
            .where_(&id, is_in_when_present(values))
            .and(&id, is_not_null())
            .limit_when_present(limit)
            .build()
            .expect("build");
        let first = model.render(&Dialect::Sqlite).expect("render");
        let second = model.render(&Dialect::Sqlite).expect("render");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn paging_parameters_follow_where_parameters(
        values in proptest::collection::vec(any::<i32>(), 0..5),
        limit in 1u64..500,
        offset in 0u64..500,
    ) {
        let table = SqlTable::new("t");
        let id = table.column("id");
        let count = values.len();
        let model = select([&id])
            .from(&table)
            .where_(&id, is_in_when_present(values))
            .limit(limit)
            .offset(offset)
            .configure(|config| config.non_rendering_where_allowed = true)
            .build()
            .expect("build");
        let rendered = model.render(&NamedColon).expect("render");
        let suffix = format!("limit :p{} offset :p{}", count + 1, count + 2);
        prop_assert!(rendered.sql.ends_with(&suffix), "{}", rendered.sql);
        prop_assert_eq!(rendered.parameters.len(), count + 2);
    }
}
