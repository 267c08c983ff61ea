// toolbelt-core/src/picker_tests.rs
#![cfg(test)]

//! End-to-end tests driving the picker, dialog, and built-in registry
//! together, the way a session frontend does.

use crate::config::ToolbeltConfig;
use crate::models::toolkit::{Selection, ToolkitId};
use crate::picker::{Picker, Preselections, ToggleOutcome};
use crate::toolkits::builtin_registry;
use serde_json::json;
use std::sync::Arc;

fn picker() -> Picker {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let registry = builtin_registry(&ToolbeltConfig::default()).unwrap();
    Picker::new(Arc::new(registry))
}

/// Drive a toggle the way a frontend does: apply whatever outcome the
/// picker reports to the caller-owned selection.
fn apply_toggle(picker: &Picker, id: ToolkitId, selection: &mut Selection) -> ToggleOutcome {
    let outcome = picker.toggle(id, selection);
    match &outcome {
        ToggleOutcome::Added(toolkit) => {
            selection.add(toolkit.clone());
        }
        ToggleOutcome::Removed(id) => {
            selection.remove(*id);
        }
        _ => {}
    }
    outcome
}

#[test]
fn filtering_built_in_registry_by_name() {
    let mut picker = picker();

    // Empty query: everything in registry order.
    let names: Vec<String> = picker
        .filtered()
        .iter()
        .map(|(_, d)| d.name.clone())
        .collect();
    assert_eq!(names, vec!["Image", "Filesystem"]);

    picker.set_query("file");
    let names: Vec<String> = picker
        .filtered()
        .iter()
        .map(|(_, d)| d.name.clone())
        .collect();
    assert_eq!(names, vec!["Filesystem"]);

    picker.set_query("IM");
    let names: Vec<String> = picker
        .filtered()
        .iter()
        .map(|(_, d)| d.name.clone())
        .collect();
    assert_eq!(names, vec!["Image"]);

    picker.set_query("spreadsheet");
    assert!(picker.filtered().is_empty());
}

#[test]
fn filesystem_select_deselect_round_trip() {
    let picker = picker();
    let mut selection = Selection::new();

    assert!(matches!(
        apply_toggle(&picker, ToolkitId::Filesystem, &mut selection),
        ToggleOutcome::Added(_)
    ));
    assert!(selection.contains(ToolkitId::Filesystem));
    assert_eq!(
        selection.get(ToolkitId::Filesystem).unwrap().parameters,
        json!({})
    );

    assert!(matches!(
        apply_toggle(&picker, ToolkitId::Filesystem, &mut selection),
        ToggleOutcome::Removed(_)
    ));
    assert!(selection.is_empty());
}

#[test]
fn image_is_only_added_through_a_valid_dialog() {
    let picker = picker();
    let mut selection = Selection::new();

    let mut dialog = match picker.toggle(ToolkitId::Image, &selection) {
        ToggleOutcome::ConfigurationRequired(dialog) => dialog,
        other => panic!("expected ConfigurationRequired, got {:?}", other),
    };
    assert!(selection.is_empty());

    // Empty draft: submission stays blocked.
    assert!(!dialog.can_submit());
    assert!(dialog.submit().is_err());

    // A model outside the catalog keeps submission blocked.
    dialog.set_field("model", json!("acme:imaginator-9000"));
    assert!(!dialog.can_submit());

    // A catalog member unblocks submission.
    dialog.set_field("model", json!("openai:dall-e-3"));
    assert!(dialog.can_submit());
    let selected = dialog.submit().unwrap();
    assert!(selection.add(selected));

    let stored = selection.get(ToolkitId::Image).unwrap();
    assert_eq!(stored.parameters, json!({"model": "openai:dall-e-3"}));
    assert!(stored.toolkit.tools.contains_key(crate::toolkits::image::GENERATE_TOOL));
}

#[test]
fn dialog_cancel_leaves_selection_untouched() {
    let picker = picker();
    let selection = Selection::new();

    match picker.toggle(ToolkitId::Image, &selection) {
        ToggleOutcome::ConfigurationRequired(dialog) => dialog.cancel(),
        other => panic!("expected ConfigurationRequired, got {:?}", other),
    }
    assert!(selection.is_empty());
}

#[test]
fn image_dialog_exposes_the_form_capability() {
    let picker = picker();
    let selection = Selection::new();

    let dialog = match picker.toggle(ToolkitId::Image, &selection) {
        ToggleOutcome::ConfigurationRequired(dialog) => dialog,
        other => panic!("expected ConfigurationRequired, got {:?}", other),
    };
    let form = dialog.form().expect("image toolkit declares a form");
    let fields = form.fields();
    assert_eq!(fields[0].name, "model");
    assert!(fields[0].choices.contains(&"openai:dall-e-3".to_string()));
}

#[test]
fn preselection_pass_adds_once_then_goes_quiet() {
    let picker = picker();
    let mut selection = Selection::new();
    let mut pending = Preselections::new();
    pending.mark("image");
    pending.set("no-such-toolkit", "true");

    let additions = picker.apply_preselections(&mut pending, &selection);
    assert_eq!(additions.len(), 1);
    for toolkit in additions {
        assert_eq!(toolkit.id, ToolkitId::Image);
        assert_eq!(toolkit.parameters, json!({}));
        selection.add(toolkit);
    }
    assert!(pending.is_empty());

    // Re-render with the cleared channel: nothing new.
    assert!(picker
        .apply_preselections(&mut pending, &selection)
        .is_empty());
    assert_eq!(selection.len(), 1);
}

#[test]
fn selecting_twice_never_duplicates() {
    let picker = picker();
    let mut selection = Selection::new();

    apply_toggle(&picker, ToolkitId::Filesystem, &mut selection);
    // A stale add request for an already-selected toolkit is refused by the
    // selection itself.
    let duplicate = match picker.toggle(ToolkitId::Image, &selection) {
        ToggleOutcome::ConfigurationRequired(mut dialog) => {
            dialog.set_field("model", json!("openai:dall-e-3"));
            dialog.submit().unwrap()
        }
        other => panic!("expected ConfigurationRequired, got {:?}", other),
    };
    assert!(selection.add(duplicate.clone()));
    assert!(!selection.add(duplicate));
    assert_eq!(selection.len(), 2);

    // Pre-selection of an already-selected id adds nothing either.
    let mut pending = Preselections::new();
    pending.mark("filesystem");
    assert!(picker
        .apply_preselections(&mut pending, &selection)
        .is_empty());
    assert_eq!(selection.len(), 2);
}
