use data_table::filter::matches_filter;
use data_table::prelude::*;
use proptest::prelude::*;

fn arb_cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Null),
        any::<bool>().prop_map(CellValue::Bool),
        any::<f64>().prop_map(CellValue::Number),
        ".{0,12}".prop_map(CellValue::Text),
    ]
}

fn arb_value() -> impl Strategy<Value = FilterValue> {
    prop_oneof![
        arb_cell().prop_map(FilterValue::Scalar),
        (arb_cell(), arb_cell()).prop_map(|(min, max)| FilterValue::Pair(min, max)),
    ]
}

fn unset_value() -> impl Strategy<Value = Option<FilterValue>> {
    prop_oneof![
        Just(None),
        Just(Some(FilterValue::scalar(CellValue::Null))),
        Just(Some(FilterValue::scalar(""))),
    ]
}

fn arb_filter_type() -> impl Strategy<Value = FilterType> {
    prop::sample::select(FilterType::ALL.to_vec())
}

fn arb_operator() -> impl Strategy<Value = Operator> {
    prop::sample::select(Operator::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_unset_value_passes(
        cell in arb_cell(),
        value in unset_value(),
        filter_type in arb_filter_type(),
        operator in arb_operator(),
    ) {
        prop_assume!(!operator.ignores_value());
        prop_assert!(matches_filter(&cell, operator, value.as_ref(), filter_type));
    }

    #[test]
    fn prop_is_empty_and_is_not_empty_are_complements(
        cell in arb_cell(),
        value in proptest::option::of(arb_value()),
        filter_type in arb_filter_type(),
    ) {
        let empty = matches_filter(&cell, Operator::IsEmpty, value.as_ref(), filter_type);
        let not_empty = matches_filter(&cell, Operator::IsNotEmpty, value.as_ref(), filter_type);
        prop_assert_ne!(empty, not_empty);
        prop_assert_eq!(empty, !cell.is_null() && cell.to_display_string().trim().is_empty());
    }

    #[test]
    fn prop_words_never_pass_number_comparisons(
        word in "[a-z]{1,8}",
        bound in -1.0e6..1.0e6f64,
        operator in prop::sample::select(FilterType::Number.operators().to_vec()),
    ) {
        let value = FilterValue::scalar(bound);
        prop_assert!(!matches_filter(&CellValue::from(word.as_str()), operator, Some(&value), FilterType::Number));
        prop_assert!(!matches_filter(&CellValue::Number(bound), operator, Some(&FilterValue::scalar(word.as_str())), FilterType::Number));
    }

    #[test]
    fn prop_words_never_pass_date_comparisons(
        word in "[a-z]{1,8}",
        operator in prop::sample::select(FilterType::Date.operators().to_vec()),
    ) {
        let value = FilterValue::scalar("2024-06-01");
        prop_assert!(!matches_filter(&CellValue::from(word.as_str()), operator, Some(&value), FilterType::Date));

        let span = FilterValue::pair("2024-01-01", "2024-12-31");
        prop_assert!(!matches_filter(&CellValue::from(word.as_str()), Operator::Between, Some(&span), FilterType::DateRange));
    }

    #[test]
    fn prop_evaluation_is_total(
        cell in arb_cell(),
        value in proptest::option::of(arb_value()),
        filter_type in arb_filter_type(),
        operator in arb_operator(),
    ) {
        let _ = matches_filter(&cell, operator, value.as_ref(), filter_type);
    }

    #[test]
    fn prop_text_matching_ignores_case(word in "[a-zA-Z]{1,10}") {
        let value = FilterValue::scalar(word.to_uppercase());
        let cell = CellValue::from(format!("<{}>", word.to_lowercase()));
        prop_assert!(matches_filter(&cell, Operator::Contains, Some(&value), FilterType::Text));
    }
}

#[test]
fn test_known_cases() {
    let cell = CellValue::from("Hello World");
    let condition = FilterCondition::new("c", "greeting", Operator::Contains).with_value(FilterValue::scalar("WORLD"));
    assert!(evaluate(&cell, &condition, FilterType::Text));

    assert!(matches_filter(&"  ".into(), Operator::IsEmpty, None, FilterType::Text));
    assert!(!matches_filter(&"x".into(), Operator::IsEmpty, None, FilterType::Text));

    let range = FilterValue::pair(5, 10);
    for (cell, expected) in [(5.0, true), (10.0, true), (4.99, false), (10.01, false)] {
        assert_eq!(
            matches_filter(&CellValue::Number(cell), Operator::Between, Some(&range), FilterType::Range),
            expected,
            "{} between 5 and 10",
            cell
        );
    }

    let over_five = FilterCondition::new("n", "count", Operator::GreaterThan).with_value(FilterValue::scalar(5));
    assert!(!evaluate(&"abc".into(), &over_five, FilterType::Number));
}
