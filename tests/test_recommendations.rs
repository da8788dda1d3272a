//! Tests for the recommendation knowledge base

use aedes::pipeline::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn english() -> RecommendationBook {
    RecommendationBook::builtin("en").unwrap().unwrap()
}

#[test]
fn test_builtin_list_lengths() {
    let book = english();

    assert_eq!(book.recommend(RiskTier::High).len(), 7);
    assert_eq!(book.recommend(RiskTier::Moderate).len(), 6);
    assert_eq!(book.recommend(RiskTier::Low).len(), 5);
}

#[test]
fn test_every_tier_has_non_blank_statements() {
    for locale in BUILTIN_LOCALES {
        let book = RecommendationBook::builtin(locale).unwrap().unwrap();
        for tier in RiskTier::ALL {
            let statements = book.recommend(tier);
            assert!(!statements.is_empty(), "{} {} is empty", locale, tier);
            assert!(statements.iter().all(|s| !s.trim().is_empty()));
        }
    }
}

#[test]
fn test_recommend_is_pure_and_ordered() {
    let book = english();
    let first = book.recommend(RiskTier::High).to_vec();
    let second = book.recommend(RiskTier::High).to_vec();

    assert_eq!(first, second);
    assert!(first[0].starts_with("Scheduled Mass Fogging"));
}

#[test]
fn test_tiers_have_distinct_lists() {
    let book = english();
    assert_ne!(book.recommend(RiskTier::Low), book.recommend(RiskTier::High));
    assert_ne!(
        book.recommend(RiskTier::Low),
        book.recommend(RiskTier::Moderate)
    );
}

#[test]
fn test_unknown_builtin_locale() {
    assert!(RecommendationBook::builtin("de").is_none());
}

#[test]
fn test_custom_knowledge_base() {
    let json = r#"{
        "locale": "en-custom",
        "tiers": {
            "Low": ["Keep monitoring"],
            "Moderate": ["Inspect larvae", "Clean gutters"],
            "High": ["Fog now"]
        }
    }"#;
    let (_dir, path) = create_temp_file("kb.json", json);
    let book = RecommendationBook::load(&path).unwrap();

    assert_eq!(book.locale(), "en-custom");
    assert_eq!(
        book.recommend(RiskTier::Moderate),
        &["Inspect larvae".to_string(), "Clean gutters".to_string()]
    );
}

#[test]
fn test_missing_tier_rejected() {
    let json = r#"{"locale": "en", "tiers": {"Low": ["a"], "High": ["b"]}}"#;
    let err = RecommendationBook::from_json(json).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::MissingTier(ref t) if t == "Moderate"));
}

#[test]
fn test_empty_tier_rejected() {
    let json = r#"{"locale": "en", "tiers": {"Low": [], "Moderate": ["a"], "High": ["b"]}}"#;
    let err = RecommendationBook::from_json(json).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::MissingTier(ref t) if t == "Low"));
}

#[test]
fn test_blank_statement_rejected() {
    let json = r#"{"locale": "en", "tiers": {"Low": ["a"], "Moderate": ["a", "  "], "High": ["b"]}}"#;
    let err = RecommendationBook::from_json(json).unwrap_err();
    assert!(matches!(
        err,
        KnowledgeBaseError::BlankStatement { index: 2, .. }
    ));
}

#[test]
fn test_builtin_statements_avoid_export_separator() {
    for locale in BUILTIN_LOCALES {
        let book = RecommendationBook::builtin(locale).unwrap().unwrap();
        for tier in RiskTier::ALL {
            assert!(book
                .recommend(tier)
                .iter()
                .all(|s| !s.contains(RECOMMENDATION_SEPARATOR)));
        }
    }
}
