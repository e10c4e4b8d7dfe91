use styledit::cql::{parse, read_cql, rows_to_cql, FilterRow};

fn triples(rows: &[FilterRow]) -> Vec<(String, String, String)> {
    rows.iter()
        .map(|r| (r.attribute.clone(), r.comparator.clone(), r.value.clone()))
        .collect()
}

#[test]
fn test_documented_example() {
    let rows = vec![FilterRow::new("pop", ">", "1000", "")];
    assert_eq!(rows_to_cql(&rows), "\"pop\" > '1000'");
}

#[test]
fn test_weak_round_trip_preserves_rows() {
    let inputs = [
        r#""pop" > '1000'"#,
        r#""name" = 'l\'île' OR "pop" <= 20"#,
        r#"("a" = 'x' OR "b" <> 'y') AND "h" BETWEEN 1 AND 2.5"#,
        r#""kind" LIKE 'road%' AND NOT "lanes" < 2"#,
        r#"type != 'rail' and speed >= 80"#,
        r#""date" BETWEEN '2020-01-01' AND '2021-01-01'"#,
        r#""code" BETWEEN '1,5' AND '2,5' OR "path" = 'C:\\'"#,
        r#""odd""name" LIKE 'a%'"#,
    ];

    for cql in inputs {
        let first = read_cql(cql);
        assert!(!first.read_failed, "could not read {}", cql);

        let regenerated = rows_to_cql(&first.rows);
        assert!(parse(&regenerated).is_ok(), "regenerated {} does not parse", regenerated);

        let second = read_cql(&regenerated);
        assert!(!second.read_failed);
        assert_eq!(triples(&first.rows), triples(&second.rows), "for {}", cql);
    }
}

#[test]
fn test_comparators_are_mapped_from_tree_symbols() {
    let form = read_cql(r#"a = 1 AND b != 'x' AND c LIKE 'y' AND d BETWEEN 1 AND 3"#);
    let comparators: Vec<&str> = form.rows.iter().map(|r| r.comparator.as_str()).collect();
    assert_eq!(comparators, vec!["=", "<>", "LIKE", "BETWEEN"]);
    let operators: Vec<&str> = form.rows.iter().map(|r| r.operator.as_str()).collect();
    assert_eq!(operators, vec!["AND", "AND", "AND", ""]);
}

#[test]
fn test_garbage_degrades_to_expert_mode() {
    for cql in ["BBOX(the_geom, 0, 0, 1, 1)", "\"a\" =", "pop > other_pop"] {
        let form = read_cql(cql);
        assert!(form.read_failed, "{} should not be structured", cql);
        assert_eq!(form.to_cql(), cql);
    }
}
