/*!
 * Tests for the reconciliation rule through the public API
 */

use alttext_sync::models::{MediaTranslation, MediaTranslationRecord};
use alttext_sync::reconcile::{duplicate_count, pair_state, PairState};
use alttext_sync::{reconcile, Action};

#[test]
fn test_reconcile_scenarioA_shouldCreateForEveryLanguage() {
    let en = reconcile("m1", "en", "Red Shirt", &[]);
    let de = reconcile("m1", "de", "Rotes Shirt", &[]);

    assert_eq!(en, Action::Create(MediaTranslationRecord::new("m1", "en", "Red Shirt")));
    assert_eq!(de, Action::Create(MediaTranslationRecord::new("m1", "de", "Rotes Shirt")));
}

#[test]
fn test_reconcile_scenarioB_shouldDoNothing() {
    let existing = vec![MediaTranslation::new("en", Some("Red Shirt"))];

    let action = reconcile("m1", "en", "Red Shirt", &existing);

    assert_eq!(action, Action::None);
    assert!(!action.is_write());
    assert!(action.record().is_none());
}

#[test]
fn test_reconcile_scenarioD_missingAlt_shouldUpdate() {
    let existing = vec![MediaTranslation::new("en", None)];

    let action = reconcile("m1", "en", "Blue Hat", &existing);

    assert_eq!(action, Action::Update(MediaTranslationRecord::new("m1", "en", "Blue Hat")));
}

#[test]
fn test_reconcile_otherLanguageOnly_shouldCreate() {
    let existing = vec![MediaTranslation::new("fr", Some("Chapeau"))];

    let action = reconcile("m1", "en", "Hat", &existing);

    assert!(matches!(action, Action::Create(_)));
}

#[test]
fn test_reconcile_comparisonIsCaseSensitive() {
    let existing = vec![MediaTranslation::new("en", Some("red shirt"))];

    assert_eq!(pair_state("en", "Red Shirt", &existing), PairState::Stale);
}

#[test]
fn test_duplicateCount_shouldCountPerLanguage() {
    let existing = vec![
        MediaTranslation::new("en", Some("A")),
        MediaTranslation::new("en", Some("B")),
        MediaTranslation::new("de", None),
    ];

    assert_eq!(duplicate_count("en", &existing), 2);
    assert_eq!(duplicate_count("de", &existing), 1);
    assert_eq!(duplicate_count("fr", &existing), 0);
}
