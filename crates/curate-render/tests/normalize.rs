use curate_core::{EvidenceValue, FieldDefinition};
use curate_render::normalize_input;
use serde_json::json;

fn definition(raw: serde_json::Value) -> FieldDefinition {
    serde_json::from_value(raw).unwrap()
}

fn normalized(def: serde_json::Value, raw: serde_json::Value) -> serde_json::Value {
    normalize_input(&definition(def), &EvidenceValue::from(raw)).to_json()
}

#[test]
fn numbers_parse_and_blank_clears() {
    let def = json!({ "type": "number" });
    assert_eq!(normalized(def.clone(), json!(" 42 ")), json!(42));
    assert_eq!(normalized(def.clone(), json!("1.5")), json!(1.5));
    assert_eq!(normalized(def.clone(), json!("")), json!(null));
    assert_eq!(normalized(def.clone(), json!("abc")), json!("abc"));
    assert_eq!(normalized(def, json!(7)), json!(7));
}

#[test]
fn checkbox_reads_common_spellings() {
    let def = json!({ "type": "boolean" });
    assert_eq!(normalized(def.clone(), json!("on")), json!(true));
    assert_eq!(normalized(def.clone(), json!("False")), json!(false));
    assert_eq!(normalized(def.clone(), json!(null)), json!(false));
    assert_eq!(normalized(def, json!(true)), json!(true));
}

#[test]
fn dates_are_stored_as_calendar_dates() {
    let def = json!({ "type": "date" });
    assert_eq!(normalized(def.clone(), json!("2024-03-05")), json!("2024-03-05"));
    assert_eq!(
        normalized(def.clone(), json!("2024-03-05T23:30:00Z")),
        json!("2024-03-05")
    );
    assert_eq!(normalized(def, json!("next tuesday")), json!("next tuesday"));
}

#[test]
fn selects_snap_to_declared_options() {
    let select = json!({ "type": "select", "enum": ["Autosomal dominant", "X-linked"] });
    assert_eq!(
        normalized(select.clone(), json!("autosomal DOMINANT ")),
        json!("Autosomal dominant")
    );
    assert_eq!(normalized(select.clone(), json!("")), json!(null));
    assert_eq!(normalized(select, json!("Digenic")), json!("Digenic"));

    let multi = json!({ "type": "multiselect", "enum": ["PVS1", "PM2"] });
    assert_eq!(normalized(multi.clone(), json!("pvs1, pm2")), json!(["PVS1", "PM2"]));
    assert_eq!(normalized(multi, json!(["pm2"])), json!(["PM2"]));
}

#[test]
fn identifiers_become_curies() {
    assert_eq!(
        normalized(json!({ "type": "hgnc_id" }), json!("hgnc:1100")),
        json!("HGNC:1100")
    );
    assert_eq!(
        normalized(json!({ "type": "mondo_id" }), json!("MONDO_7254")),
        json!("MONDO:0007254")
    );
    assert_eq!(
        normalized(json!({ "type": "omim_id" }), json!("113705")),
        json!("OMIM:113705")
    );
    assert_eq!(
        normalized(json!({ "type": "hgnc_id" }), json!("BRCA1")),
        json!("BRCA1")
    );
}

#[test]
fn lookups_normalize_like_their_registries() {
    assert_eq!(
        normalized(json!({ "type": "text", "component": "GeneLookup" }), json!(" 1100 ")),
        json!("HGNC:1100")
    );
    assert_eq!(
        normalized(json!({ "type": "text", "component": "DiseaseLookup" }), json!("mondo:7254")),
        json!("MONDO:0007254")
    );
    assert_eq!(
        normalized(json!({ "type": "pmid", "component": "PublicationLookup" }), json!("PMID: 20301425")),
        json!("20301425")
    );
    assert_eq!(
        normalized(json!({ "type": "pmid" }), json!(20301425)),
        json!("20301425")
    );
}

#[test]
fn phenotype_picker_accepts_text_or_lists() {
    let def = json!({ "type": "multiselect", "component": "PhenotypeTermPicker" });
    assert_eq!(
        normalized(def.clone(), json!("HP:0001250; hp_3002")),
        json!(["HP:0001250", "HP:0003002"])
    );
    assert_eq!(normalized(def.clone(), json!(["1250"])), json!(["HP:0001250"]));
    assert_eq!(normalized(def, json!(null)), json!([]));
}

#[test]
fn score_input_parses_points() {
    let def = json!({ "type": "score", "component": "ScoreInput", "minimum": 0, "maximum": 3 });
    assert_eq!(normalized(def.clone(), json!("0.5")), json!(0.5));
    assert_eq!(normalized(def, json!("4")), json!(4));
}

#[test]
fn text_is_kept_as_typed() {
    assert_eq!(
        normalized(json!({ "type": "text" }), json!("  spaced  ")),
        json!("  spaced  ")
    );
    assert_eq!(
        normalized(json!({ "type": "email" }), json!(" curator@example.org ")),
        json!("curator@example.org")
    );
}
