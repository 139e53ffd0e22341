use std::collections::BTreeSet;
use std::sync::Arc;

use curate_core::Schema;
use curate_layout::{SectionOpenState, SectionView, initial_open_sections, organize};
use serde_json::json;

fn sections(collapsed: &[Option<bool>]) -> Arc<Vec<SectionView>> {
    let declared: Vec<serde_json::Value> = collapsed
        .iter()
        .enumerate()
        .map(|(i, c)| match c {
            Some(c) => json!({ "name": format!("S{i}"), "collapsed": c, "fields": ["a"] }),
            None => json!({ "name": format!("S{i}"), "fields": ["a"] }),
        })
        .collect();
    let schema = Schema::from_value(json!({
        "field_definitions": { "a": { "type": "text" } },
        "ui_configuration": { "layout": { "tabs": [ { "name": "T", "sections": declared } ] } }
    }))
    .unwrap();
    let layout = organize(&schema);
    Arc::clone(&layout.tabs()[0].sections)
}

#[test]
fn collapsed_sections_start_closed() {
    let list = sections(&[Some(true), None, Some(false)]);
    assert_eq!(initial_open_sections(&list), BTreeSet::from([1, 2]));

    let state = SectionOpenState::new(&list);
    assert!(!state.is_open(0));
    assert!(state.is_open(1));
    assert!(state.is_open(2));
}

#[test]
fn toggle_flips_one_section() {
    let list = sections(&[Some(true), None]);
    let mut state = SectionOpenState::new(&list);

    state.toggle(0);
    state.toggle(1);
    assert_eq!(state.open_sections(), &BTreeSet::from([0]));

    state.toggle(7);
    assert_eq!(state.open_sections(), &BTreeSet::from([0]));
}

#[test]
fn same_list_keeps_state_new_list_resets_it() {
    let list = sections(&[None, None]);
    let mut state = SectionOpenState::new(&list);
    state.toggle(0);

    assert!(!state.sync(&Arc::clone(&list)));
    assert!(!state.is_open(0));

    // Equal contents, different list: recomputed from the collapsed flags.
    let replacement = Arc::new(list.as_ref().clone());
    assert!(state.sync(&replacement));
    assert!(state.is_open(0));
}
