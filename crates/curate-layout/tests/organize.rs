use curate_core::{FieldPath, Schema};
use curate_layout::{Layout, organize, unplaced_fields, unresolved_section_fields};
use serde_json::json;

const GENE_DISEASE: &str = include_str!("../../../fixtures/gene_disease_schema.json");
const VARIANT: &str = include_str!("../../../fixtures/variant_schema.json");

fn paths(raw: &[&str]) -> Vec<FieldPath> {
    raw.iter().map(|p| FieldPath::parse(p)).collect()
}

#[test]
fn no_layout_gives_flat_declaration_order() {
    let schema = Schema::from_json(VARIANT).unwrap();
    let layout = organize(&schema);

    assert!(layout.is_flat());
    assert_eq!(
        layout,
        Layout::Flat {
            fields: paths(&["variant", "population_frequency", "criteria", "curator_notes"])
        }
    );
    assert!(layout.tabs().is_empty());
}

#[test]
fn declared_tabs_are_emitted_verbatim() {
    let schema = Schema::from_json(GENE_DISEASE).unwrap();
    let layout = organize(&schema);

    let tabs = layout.tabs();
    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[0].id, "curation");
    assert_eq!(tabs[0].icon.as_deref(), Some("clipboard"));
    assert!(!tabs[0].show_score_badge);
    assert!(tabs[1].show_score_badge);

    let names: Vec<&str> = tabs[1].sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Genetic", "Experimental", "Contradictory"]);
    assert_eq!(
        tabs[1].sections[0].fields,
        paths(&["genetic_evidence.case_level", "genetic_evidence.segregation_lod"])
    );
    assert!(!tabs[0].sections[1].initially_open);
    assert!(tabs[1].sections[1].initially_open);
}

#[test]
fn duplicates_and_order_are_not_touched() {
    let schema = Schema::from_value(json!({
        "field_definitions": { "a": { "type": "text" }, "b": { "type": "text" } },
        "ui_configuration": { "layout": { "tabs": [
            { "id": "only", "name": "Only", "sections": [
                { "name": "S", "fields": ["b", "a", "b"] }
            ] }
        ] } }
    }))
    .unwrap();

    let layout = organize(&schema);
    assert_eq!(layout.tabs().len(), 1);
    assert_eq!(layout.tabs()[0].sections[0].fields, paths(&["b", "a", "b"]));
    let order: Vec<String> = layout.field_paths().iter().map(|p| p.to_string()).collect();
    assert_eq!(order, ["b", "a", "b"]);
}

#[test]
fn layout_without_usable_tabs_falls_back_to_flat() {
    for tabs in [json!([]), json!([{ "id": "empty", "name": "Empty", "sections": [] }])] {
        let schema = Schema::from_value(json!({
            "field_definitions": { "a": { "type": "text" }, "b": { "type": "number" } },
            "ui_configuration": { "layout": { "tabs": tabs } }
        }))
        .unwrap();

        assert_eq!(
            organize(&schema),
            Layout::Flat {
                fields: paths(&["a", "b"])
            }
        );
    }
}

#[test]
fn layout_serializes_with_a_kind_tag() {
    let schema = Schema::from_json(VARIANT).unwrap();
    let value = serde_json::to_value(organize(&schema)).unwrap();
    assert_eq!(value["kind"], "flat");
    assert_eq!(value["fields"][0], "variant");

    let schema = Schema::from_json(GENE_DISEASE).unwrap();
    let value = serde_json::to_value(organize(&schema)).unwrap();
    assert_eq!(value["kind"], "tabbed");
    assert_eq!(value["tabs"][1]["showScoreBadge"], true);
    assert_eq!(value["tabs"][0]["sections"][1]["helpText"], "Free-text narrative");
}

#[test]
fn audit_reports_unplaced_and_unresolved_paths() {
    let schema = Schema::from_json(GENE_DISEASE).unwrap();
    assert_eq!(unplaced_fields(&schema), paths(&["curator_email"]));
    assert!(unresolved_section_fields(&schema).is_empty());

    let schema = Schema::from_value(json!({
        "field_definitions": { "a": { "type": "text" }, "b": { "type": "text" } },
        "ui_configuration": { "layout": { "tabs": [
            { "name": "T", "sections": [ { "name": "S", "fields": ["a", "ghost.field"] } ] }
        ] } }
    }))
    .unwrap();
    assert_eq!(unplaced_fields(&schema), paths(&["b"]));
    assert_eq!(unresolved_section_fields(&schema), paths(&["ghost.field"]));

    let flat = Schema::from_json(VARIANT).unwrap();
    assert!(unplaced_fields(&flat).is_empty());
}
