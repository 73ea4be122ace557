//! Card directory loader tests.
//!
//! These tests verify that loading fails closed: bad files are skipped,
//! duplicates keep their first definition, and decks merge across files.

use std::fs;

use capital_ccg::cards::{CatalogLoader, DeckId, JsonDirLoader};
use capital_ccg::core::ResourceKind;
use capital_ccg::effects::{Condition, Effect};

const HARM_FILE: &str = r#"{ "decks": [ { "name": "Harm", "cards": [
    { "id": "drought", "title": "Drought", "description": "The rains fail.",
      "choices": [
        { "label": "Ration",
          "effects": [ { "type": "Resource", "kind": "Food", "amount": -5 } ],
          "conditions": [ { "type": "Resource", "kind": "Food", "min_amount": 5 } ] },
        { "label": "Endure",
          "effects": [ { "type": "Capital", "capital": "Population", "amount": -10.0 } ] }
      ] }
] } ] }"#;

const MIXED_FILE: &str = r#"{ "decks": [
    { "name": "Progression", "cards": [ { "id": "roads", "title": "Roads" } ] },
    { "name": "Harm", "cards": [
        { "id": "drought", "title": "Another Drought" },
        { "id": "plague" }
    ] }
] }"#;

/// Files load in name order and decks merge by name.
#[test]
fn test_directory_merges_decks() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a_harm.json"), HARM_FILE).unwrap();
    fs::write(dir.path().join("b_mixed.json"), MIXED_FILE).unwrap();

    let catalog = JsonDirLoader::new(dir.path()).build_catalog().unwrap();

    let decks: Vec<_> = catalog.deck_ids().map(DeckId::as_str).collect();
    assert_eq!(decks, vec!["Harm", "Progression"]);
    assert_eq!(catalog.all(&DeckId::harm()).len(), 2);
    assert_eq!(catalog.len(), 3);

    // The first definition of a duplicate id wins.
    let drought = catalog.get(&DeckId::harm(), "drought").unwrap();
    assert_eq!(drought.title, "Drought");
    assert_eq!(drought.description, "The rains fail.");

    // Missing title falls back to the default.
    assert_eq!(catalog.get(&DeckId::harm(), "plague").unwrap().title, "No Title");
}

/// Conditions and effects deserialize into their typed forms.
#[test]
fn test_choice_format() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("harm.json"), HARM_FILE).unwrap();

    let catalog = JsonDirLoader::new(dir.path()).build_catalog().unwrap();
    let drought = catalog.get(&DeckId::harm(), "drought").unwrap();

    let ration = &drought.choices[0];
    assert_eq!(ration.effects.as_slice(), &[Effect::cost(ResourceKind::Food, 5)]);
    assert_eq!(
        ration.conditions.as_slice(),
        &[Condition::resource_at_least(ResourceKind::Food, 5)]
    );

    let endure = &drought.choices[1];
    assert_eq!(endure.effects.as_slice(), &[Effect::capital("Population", -10.0)]);
    assert!(endure.is_unconditional());
}

/// Malformed files and non-JSON files are skipped; the rest loads.
#[test]
fn test_bad_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), "{ \"decks\": [ { \"name\": ").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a card file").unwrap();
    fs::write(dir.path().join("harm.json"), HARM_FILE).unwrap();
    fs::create_dir(dir.path().join("nested.json")).unwrap();

    let catalog = JsonDirLoader::new(dir.path()).build_catalog().unwrap();

    assert_eq!(catalog.deck_count(), 1);
    assert_eq!(catalog.len(), 1);
}

/// An empty or missing directory yields an empty catalog.
#[test]
fn test_empty_and_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    assert!(JsonDirLoader::new(dir.path()).build_catalog().unwrap().is_empty());

    let missing = dir.path().join("does-not-exist");
    assert!(JsonDirLoader::new(missing).build_catalog().unwrap().is_empty());
}
