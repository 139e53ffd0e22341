use curate_core::{EvidenceValue, FieldDefinition, FieldType};
use curate_rules::{Rule, RuleKind, RuleOutcome, compile, first_failure};
use serde_json::json;

fn definition(raw: serde_json::Value) -> FieldDefinition {
    serde_json::from_value(raw).expect("definition parses")
}

fn value(raw: serde_json::Value) -> EvidenceValue {
    EvidenceValue::from(raw)
}

fn outcomes(rules: &[Rule], v: Option<&EvidenceValue>) -> Vec<RuleOutcome> {
    rules.iter().map(|r| r.check(v)).collect()
}

fn fail(message: &str) -> RuleOutcome {
    RuleOutcome::Fail(message.to_string())
}

#[test]
fn no_constraints_no_rules() {
    assert!(compile(&FieldDefinition::new(FieldType::Text)).is_empty());
}

#[test]
fn required_rejects_empty_values_only() {
    let rules = compile(&definition(json!({ "type": "text", "required": true })));
    assert_eq!(rules.len(), 1);

    for empty in [json!(null), json!(""), json!([])] {
        assert_eq!(rules[0].check(Some(&value(empty.clone()))), fail("Required"), "{empty}");
    }
    assert_eq!(rules[0].check(None), fail("Required"));

    for filled in [json!("x"), json!("   "), json!(0), json!(false), json!(["a"]), json!({})] {
        assert!(rules[0].check(Some(&value(filled.clone()))).is_pass(), "{filled}");
    }
}

#[test]
fn combined_length_rules_report_in_declared_order() {
    let rules = compile(&definition(json!({
        "type": "text",
        "required": true,
        "minLength": 5,
        "maxLength": 10
    })));
    assert_eq!(rules.len(), 3);

    let empty = value(json!(""));
    assert_eq!(
        outcomes(&rules, Some(&empty)),
        vec![fail("Required"), RuleOutcome::Pass, RuleOutcome::Pass]
    );

    let short = value(json!("abc"));
    assert_eq!(
        outcomes(&rules, Some(&short)),
        vec![RuleOutcome::Pass, fail("Minimum 5 characters"), RuleOutcome::Pass]
    );

    let long = value(json!("abcdefghijk"));
    assert_eq!(
        outcomes(&rules, Some(&long)),
        vec![RuleOutcome::Pass, RuleOutcome::Pass, fail("Maximum 10 characters")]
    );

    let fits = value(json!("abcdef"));
    assert!(outcomes(&rules, Some(&fits)).iter().all(RuleOutcome::is_pass));
    assert_eq!(first_failure(&rules, Some(&fits)), None);
}

#[test]
fn bound_of_zero_is_enforced() {
    let rules = compile(&definition(json!({ "type": "number", "minimum": 0 })));
    assert_eq!(
        rules[0].check(Some(&value(json!(-1)))),
        fail("Minimum value is 0")
    );
    assert!(rules[0].check(Some(&value(json!(0)))).is_pass());

    let rules = compile(&definition(json!({ "type": "number", "maximum": 0 })));
    assert_eq!(
        rules[0].check(Some(&value(json!(0.5)))),
        fail("Maximum value is 0")
    );
}

#[test]
fn bounds_skip_empty_and_read_numeric_strings() {
    let rules = compile(&definition(json!({ "type": "number", "minimum": 1.5, "maximum": 3 })));

    for skipped in [json!(null), json!(""), json!("abc")] {
        assert!(
            outcomes(&rules, Some(&value(skipped.clone()))).iter().all(RuleOutcome::is_pass),
            "{skipped}"
        );
    }
    assert!(outcomes(&rules, None).iter().all(RuleOutcome::is_pass));

    assert_eq!(
        first_failure(&rules, Some(&value(json!(" 1 ")))),
        Some("Minimum value is 1.5".to_string())
    );
    assert_eq!(
        first_failure(&rules, Some(&value(json!("4")))),
        Some("Maximum value is 3".to_string())
    );
}

#[test]
fn lengths_count_characters_and_elements() {
    let rules = compile(&definition(json!({ "type": "text", "minLength": 3, "maxLength": 4 })));

    assert_eq!(
        first_failure(&rules, Some(&value(json!("ab")))),
        Some("Minimum 3 characters".to_string())
    );
    assert_eq!(first_failure(&rules, Some(&value(json!("ééé")))), None);
    assert_eq!(
        first_failure(&rules, Some(&value(json!("abcde")))),
        Some("Maximum 4 characters".to_string())
    );
    assert_eq!(
        first_failure(&rules, Some(&value(json!(["a", "b"])))),
        Some("Minimum 3 characters".to_string())
    );

    // Blank values are left to `required`.
    for blank in [json!(null), json!(""), json!([]), json!(0), json!(false)] {
        assert_eq!(first_failure(&rules, Some(&value(blank.clone()))), None, "{blank}");
    }
}

#[test]
fn broken_pattern_fails_closed() {
    let rules = compile(&definition(json!({ "type": "text", "pattern": "([a-z" })));
    assert!(matches!(rules[0].kind(), RuleKind::Pattern(None)));

    for input in [json!("anything"), json!(""), json!(null)] {
        assert_eq!(
            rules[0].check(Some(&value(input.clone()))),
            fail("Invalid pattern configuration"),
            "{input}"
        );
    }
}

#[test]
fn pattern_tests_string_form_and_skips_falsy() {
    let rules = compile(&definition(json!({ "type": "pmid", "pattern": "^[0-9]+$" })));
    assert!(rules[0].check(Some(&value(json!("20301425")))).is_pass());
    assert!(rules[0].check(Some(&value(json!(20301425)))).is_pass());
    assert!(rules[0].check(Some(&value(json!("")))).is_pass());
    assert_eq!(
        rules[0].check(Some(&value(json!("PMID:1")))),
        fail("Invalid format")
    );
}

#[test]
fn rules_come_out_in_fixed_order_with_override() {
    let rules = compile(&definition(json!({
        "type": "text",
        "required": true,
        "minLength": 3,
        "pattern": "^[0-9]+$",
        "errorMessage": "bad"
    })));

    assert_eq!(rules.len(), 3);
    assert!(matches!(rules[0].kind(), RuleKind::Required));
    assert!(matches!(rules[1].kind(), RuleKind::MinLength(3)));
    assert!(matches!(rules[2].kind(), RuleKind::Pattern(Some(_))));

    assert_eq!(
        outcomes(&rules, Some(&value(json!("ab")))),
        vec![RuleOutcome::Pass, fail("bad"), fail("bad")]
    );
}

#[test]
fn membership_checks_scalars_and_every_list_element() {
    let rules = compile(&definition(json!({ "type": "select", "enum": ["AD", "AR", 3] })));

    assert!(rules[0].check(Some(&value(json!("AD")))).is_pass());
    assert!(rules[0].check(Some(&value(json!(3.0)))).is_pass());
    assert!(rules[0].check(Some(&value(json!(["AD", "AR"])))).is_pass());
    assert!(rules[0].check(Some(&value(json!("")))).is_pass());
    assert_eq!(
        rules[0].check(Some(&value(json!("XL")))),
        fail("Must be one of: AD, AR, 3")
    );
    assert_eq!(
        rules[0].check(Some(&value(json!(["AD", "XL"])))),
        fail("Must be one of: AD, AR, 3")
    );
}

#[test]
fn non_list_enum_produces_no_rule() {
    let rules = compile(&definition(json!({ "type": "select", "enum": "AD" })));
    assert!(rules.is_empty());
}
