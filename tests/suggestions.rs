use tag_engine::error::EngineError;
use tag_engine::suggest::{
    aggregate, ranked_confidence, Suggestion, SuggestionBatch, SuggestionCandidate,
    SuggestionSource,
};
use tag_engine::{Tag, TagCategory, TagEngine};

fn tag(id: &str, name: &str) -> Tag {
    Tag::new(id, name, TagCategory::Community)
}

fn entry(id: &str, name: &str, confidence: f64) -> SuggestionCandidate {
    SuggestionCandidate {
        tag: tag(id, name),
        confidence,
    }
}

fn ids(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.tag.id.as_str()).collect()
}

#[test]
fn aggregate_deduplicates_by_tag_id() {
    let batches = vec![
        SuggestionBatch::new(
            SuggestionSource::ContentMatch,
            vec![entry("t1", "cleanair", 0.8), entry("t2", "cleanwater", 0.6)],
        ),
        SuggestionBatch::new(
            SuggestionSource::Trending,
            vec![entry("t1", "cleanair", 0.5), entry("t3", "recycle", 0.7)],
        ),
    ];

    let result = aggregate(batches, 10).unwrap();

    assert_eq!(result.len(), 3);
    let mut seen: Vec<&str> = ids(&result);
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 3);
}

#[test]
fn aggregate_keeps_highest_confidence_entry() {
    let batches = vec![
        SuggestionBatch::new(
            SuggestionSource::CategoryMatch,
            vec![entry("t1", "cleanair", 0.4)],
        ),
        SuggestionBatch::new(
            SuggestionSource::ContentMatch,
            vec![entry("t1", "cleanair", 0.9)],
        ),
        SuggestionBatch::new(
            SuggestionSource::PersonalHistory,
            vec![entry("t1", "cleanair", 0.3)],
        ),
    ];

    let result = aggregate(batches, 10).unwrap();

    assert_eq!(result.len(), 1);
    let merged = &result[0];
    assert!((merged.confidence - 0.9).abs() < 1e-12);
    assert_eq!(merged.source, SuggestionSource::ContentMatch);
    assert_eq!(merged.corroborated_by.len(), 2);
    assert!(merged
        .corroborated_by
        .contains(&SuggestionSource::CategoryMatch));
    assert!(merged
        .corroborated_by
        .contains(&SuggestionSource::PersonalHistory));
}

#[test]
fn aggregate_sorts_by_confidence_then_tie_breaks() {
    let mut popular = tag("t1", "popular");
    popular.usage_count = 500;
    let mut quiet = tag("t2", "quiet");
    quiet.usage_count = 10;
    let mut trending = tag("t3", "hot");
    trending.usage_count = 10;
    trending.is_trending = true;
    let mut verified = tag("t4", "official");
    verified.usage_count = 10;
    verified.is_verified = true;

    let batches = vec![SuggestionBatch::new(
        SuggestionSource::CategoryMatch,
        vec![
            SuggestionCandidate {
                tag: quiet,
                confidence: 0.5,
            },
            SuggestionCandidate {
                tag: verified,
                confidence: 0.5,
            },
            SuggestionCandidate {
                tag: popular,
                confidence: 0.5,
            },
            SuggestionCandidate {
                tag: trending,
                confidence: 0.5,
            },
        ],
    )];

    let result = aggregate(batches, 10).unwrap();

    // equal confidence: usage wins, then trending, then verified
    assert_eq!(ids(&result), vec!["t1", "t3", "t4", "t2"]);
}

#[test]
fn aggregate_respects_limit() {
    let entries = (0..20)
        .map(|i| entry(&format!("t{}", i), "some_tag", 0.5))
        .collect();
    let batches = vec![SuggestionBatch::new(SuggestionSource::Trending, entries)];

    let result = aggregate(batches, 5).unwrap();
    assert_eq!(result.len(), 5);

    let empty = aggregate(vec![], 5).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn aggregate_is_deterministic() {
    let build = || {
        vec![
            SuggestionBatch::new(
                SuggestionSource::ContentMatch,
                vec![entry("t1", "alpha", 0.5), entry("t2", "beta", 0.5)],
            ),
            SuggestionBatch::new(
                SuggestionSource::CoOccurrence,
                vec![entry("t3", "gamma", 0.5), entry("t1", "alpha", 0.5)],
            ),
        ]
    };

    let first = aggregate(build(), 10).unwrap();
    let second = aggregate(build(), 10).unwrap();

    assert_eq!(ids(&first), ids(&second));
    for (a, b) in first.iter().zip(second.iter()) {
        assert!((a.confidence - b.confidence).abs() < 1e-12);
        assert_eq!(a.source, b.source);
    }
}

#[test]
fn aggregate_rejects_out_of_range_confidence() {
    let batches = vec![SuggestionBatch::new(
        SuggestionSource::Trending,
        vec![entry("t1", "alpha", 1.2)],
    )];
    assert!(matches!(
        aggregate(batches, 10),
        Err(EngineError::OutOfRange { field: "confidence", .. })
    ));
}

#[test]
fn content_match_batch_scores_by_similarity() {
    let batch = SuggestionBatch::from_content_match(
        "climatechange",
        vec![tag("t1", "climate_change"), tag("t2", "recycle")],
    );

    assert_eq!(batch.source, SuggestionSource::ContentMatch);
    assert!((batch.entries[0].confidence - 1.0).abs() < 1e-12);
    assert!(batch.entries[1].confidence < 0.9);
}

#[test]
fn trending_batch_scales_trend_score() {
    let mut hot = tag("t1", "hot");
    hot.trend_score = 82.5;
    let batch = SuggestionBatch::from_trending(vec![hot]);

    assert_eq!(batch.source, SuggestionSource::Trending);
    assert!((batch.entries[0].confidence - 0.825).abs() < 1e-12);
}

#[test]
fn ranked_batches_decay_down_the_list() {
    let candidates: Vec<Tag> = (0..4)
        .map(|i| tag(&format!("t{}", i), "some_tag"))
        .collect();
    let batch = SuggestionBatch::from_category_match(candidates);

    assert_eq!(batch.source, SuggestionSource::CategoryMatch);
    for window in batch.entries.windows(2) {
        assert!(window[0].confidence >= window[1].confidence);
    }
    assert!((batch.entries[0].confidence - 0.6).abs() < 1e-12);
    assert!((batch.entries[1].confidence - 0.54).abs() < 1e-9);
}

#[test]
fn ranked_confidence_never_falls_below_floor() {
    assert!(ranked_confidence(0.6, 1_000) >= 0.05);
    assert!((ranked_confidence(0.7, 0) - 0.7).abs() < 1e-12);
}

#[test]
fn engine_facade_merges_multiple_sources() {
    let engine = TagEngine::with_defaults().unwrap();

    let mut trending_tag = tag("t2", "cleanwater");
    trending_tag.trend_score = 95.0;
    trending_tag.is_trending = true;

    let batches = vec![
        SuggestionBatch::from_content_match(
            "cleanair",
            vec![tag("t1", "cleanair"), tag("t2", "cleanwater")],
        ),
        SuggestionBatch::from_trending(vec![trending_tag]),
        SuggestionBatch::from_personal_history(vec![tag("t3", "recycle")]),
    ];

    let result = engine.aggregate_suggestions(batches, 2).unwrap();

    assert_eq!(result.len(), 2);
    // exact content match outranks everything
    assert_eq!(result[0].tag.id, "t1");
    assert!((result[0].confidence - 1.0).abs() < 1e-12);
    // cleanwater keeps its stronger trending confidence and records the
    // weaker content-match proposal
    assert_eq!(result[1].tag.id, "t2");
    assert_eq!(result[1].source, SuggestionSource::Trending);
    assert!(result[1]
        .corroborated_by
        .contains(&SuggestionSource::ContentMatch));
}
