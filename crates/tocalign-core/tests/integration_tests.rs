//! End-to-end tests for the complete alignment workflow.
//!
//! These tests exercise the full workflow:
//! 1. Loading: JSON textbook files → section trees
//! 2. Matching: TF-IDF pass → embedding pass on the same session
//! 3. Output: report, expert evaluation, dataset export
//!
//! Run with: `cargo test -p tocalign-core --test integration_tests`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tocalign_core::config::UNMATCHED_KEY;
use tocalign_core::evaluation::{ExpertMappingProvider, JsonExpertMapping};
use tocalign_core::export::write_results;
use tocalign_core::integration::MatchTarget;
use tocalign_core::pipeline::{tfidf_embedding_integration, PipelineConfig};
use tocalign_core::textbook::{
    DocumentLoader, InMemoryLoader, JsonLoader, SectionSource, TextbookSource,
};

// ============================================================================
// Test Fixtures
// ============================================================================

fn base_source() -> TextbookSource {
    TextbookSource::new(
        "College Physics",
        vec![
            SectionSource::new(
                "Kinematics",
                "displacement velocity and acceleration describe motion",
            )
            .with_subsections(vec![
                SectionSource::new(
                    "Projectile motion",
                    "a projectile follows a parabolic trajectory under gravity",
                ),
                SectionSource::new(
                    "Relative velocity",
                    "velocities add between moving reference frames",
                ),
            ]),
            SectionSource::new(
                "Electric charge",
                "coulomb law gives the force between point charges",
            ),
        ],
    )
}

fn other_source() -> TextbookSource {
    TextbookSource::new(
        "University Physics",
        vec![
            // Same text as the base section, so both passes agree on it.
            SectionSource::new(
                "Projectile motion",
                "a projectile follows a parabolic trajectory under gravity",
            ),
            SectionSource::new(
                "Coulomb law",
                "the electric force between point charges follows coulomb law",
            ),
            SectionSource::new(
                "Nuclear fission",
                "heavy nuclei split releasing neutrons",
            ),
        ],
    )
}

fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_load_integrate_report() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write_json(dir.path(), "base.json", &base_source());
    let other_path = write_json(dir.path(), "other.json", &other_source());

    let (base, others) = JsonLoader::new([&base_path, &other_path]).load().unwrap();
    assert_eq!(base.name(), "College Physics");
    assert_eq!(others.len(), 1);

    let config = PipelineConfig::default();
    let session =
        tfidf_embedding_integration(&base, &others, &config, config.embedder().unwrap()).unwrap();

    // Every other-section was assigned exactly once.
    assert_eq!(session.mapping().len(), others[0].len());

    let twin = base.section_by_key("1.1").unwrap().id();
    let copy = others[0].section_by_key("1").unwrap().id();
    assert_eq!(session.mapping().target_of(copy), Some(MatchTarget::Base(twin)));

    let report = session.render_matches();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "1 Kinematics");
    assert_eq!(lines[1], "\t1.1 Projectile motion");
    assert_eq!(lines[2], "\t\t-\tUniversity Physics:1 Projectile motion");
    assert!(lines
        .last()
        .unwrap()
        .ends_with(" unmatched sections"));
}

#[test]
fn test_evaluate_against_expert_file() {
    let dir = tempfile::tempdir().unwrap();
    let (base, others) = JsonLoader::new([
        write_json(dir.path(), "base.json", &base_source()),
        write_json(dir.path(), "other.json", &other_source()),
    ])
    .load()
    .unwrap();

    let expert_entries = BTreeMap::from([
        ("1.1".to_string(), vec!["1".to_string()]),
        ("2".to_string(), vec!["2".to_string()]),
        (UNMATCHED_KEY.to_string(), vec!["3".to_string()]),
    ]);
    let expert_path = write_json(dir.path(), "expert.json", &expert_entries);
    let expert = JsonExpertMapping::load(&expert_path)
        .unwrap()
        .expert_mapping(&base, &others[0])
        .unwrap();

    let config = PipelineConfig::default();
    let session =
        tfidf_embedding_integration(&base, &others, &config, config.embedder().unwrap()).unwrap();
    let metrics = session.evaluate(&expert).unwrap();

    assert!(metrics.true_positives >= 1);
    assert!(metrics.precision.is_some());
    assert!(metrics.recall.is_some());
    let jaccard = metrics.jaccard_index.unwrap();
    assert!((0.0..=1.0).contains(&jaccard));
}

#[test]
fn test_export_dataset() {
    let (base, others) = InMemoryLoader::new(base_source(), vec![other_source()])
        .load()
        .unwrap();
    let config = PipelineConfig::default();
    let session =
        tfidf_embedding_integration(&base, &others, &config, config.embedder().unwrap()).unwrap();

    let records = session.dataset();
    assert!(!records.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.jsonl");
    let written = write_results(&records, &path).unwrap();
    assert_eq!(written, records.len());

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), records.len());
    for line in text.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["topic"].is_string());
        assert!(value["concepts"].is_array());
    }

    let projectile = records
        .iter()
        .find(|r| r.textbook == "University Physics" && r.subtopic == "Projectile motion")
        .unwrap();
    assert_eq!(projectile.topic, "Kinematics");
}

#[test]
fn test_same_seed_same_iterative_result() {
    let (base, others) = InMemoryLoader::new(base_source(), vec![other_source()])
        .load()
        .unwrap();
    let config = PipelineConfig {
        iterative: true,
        ..PipelineConfig::default()
    };

    let first =
        tfidf_embedding_integration(&base, &others, &config, config.embedder().unwrap()).unwrap();
    let second =
        tfidf_embedding_integration(&base, &others, &config, config.embedder().unwrap()).unwrap();
    assert_eq!(first.mapping(), second.mapping());
    assert_eq!(first.render_matches(), second.render_matches());
}
