//! Integration tests for the opdesign library

use opdesign::formula::{ComputationError, FormulaError};
use opdesign::prelude::*;
use opdesign::template::TemplateError;
use opdesign::{
    format_capacitance, format_resistance, parse_value, Catalog, Confidence, Language, MatchKind,
    NumericParser,
};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn english_core() -> DesignCore {
    DesignCore::with_embedded_catalog(DesignConfig::default())
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

#[test]
fn test_exact_match_beats_near_identical_entry() {
    let catalog = Catalog::from_file(&fixture_path("near_duplicates.json")).unwrap();
    let core = DesignCore::new(catalog, DesignConfig::default());

    let found = core.select("low pass filter", SelectionStrategy::Similarity).unwrap();
    assert_eq!(found.archetype.id, 2);
    assert_eq!(found.kind, MatchKind::Exact);
    assert_eq!(found.score, 1.0);
}

#[test]
fn test_strict_exact_match_beats_earlier_substring_entry() {
    let catalog = Catalog::from_file(&fixture_path("near_duplicates.json")).unwrap();
    let core = DesignCore::new(catalog, DesignConfig::default());

    let found = core.select("low pass filter", SelectionStrategy::Strict).unwrap();
    assert_eq!(found.archetype.id, 2);
    assert_eq!(found.kind, MatchKind::Exact);
}

#[test]
fn test_design_match_sizes_the_selected_archetype() {
    let config = DesignConfig {
        language: Language::Tr,
        ..DesignConfig::default()
    };
    let core = DesignCore::with_embedded_catalog(config);
    let selected = core.select("INTEGRAL ALICI", SelectionStrategy::Strict).unwrap();
    assert_eq!(selected.archetype.id, 9);

    let result = core
        .design_match(&selected, DesignTargets::new().with_time_constant(1e-3))
        .unwrap();
    assert_eq!(result.archetype.id, 9);
    assert_eq!(result.kind, ArchetypeKind::Integrator);
    assert_eq!(result.match_kind, MatchKind::Exact);
    assert!(approx(result.values.number("C").unwrap(), 1e-7));
}

#[test]
fn test_free_text_query_finds_inverting_amplifier() {
    let core = english_core();
    let found = core
        .select("I need an amplifier that inverts", SelectionStrategy::Similarity)
        .unwrap();
    assert_eq!(found.archetype.name, "Inverting Amplifier");
    assert_eq!(found.kind, MatchKind::Similarity);
    assert!(found.score > 0.0 && found.score < 1.0);
}

#[test]
fn test_unrelated_query_is_no_match() {
    let core = english_core();
    let result = core.design("xyzzy", SelectionStrategy::Similarity, DesignTargets::new());
    assert!(matches!(result, Err(DesignError::NoMatch(_))));

    let result = core.design("  ", SelectionStrategy::Similarity, DesignTargets::new());
    assert!(matches!(result, Err(DesignError::InvalidQuery)));
}

#[test]
fn test_strict_selection_uses_substrings() {
    let core = english_core();
    let found = core.select("SCHMITT", SelectionStrategy::Strict).unwrap();
    assert_eq!(found.archetype.name, "Schmitt Trigger");
    assert_eq!(found.kind, MatchKind::Substring);
    assert_eq!(found.confidence, Confidence::High);

    assert!(matches!(
        core.select("band-pass", SelectionStrategy::Strict),
        Err(DesignError::NoMatch(_))
    ));
}

#[test]
fn test_numeric_notation() {
    assert_eq!(parse_value("10k").unwrap(), 10_000.0);
    assert!(approx(parse_value("1u").unwrap(), 1e-6));
    assert!(approx(parse_value("4.7n").unwrap(), 4.7e-9));
    assert!(approx(parse_value("2.2M").unwrap(), 2.2e6));
    assert!(approx(parse_value("1ms").unwrap(), 1e-3));
    assert_eq!(parse_value("100ohm").unwrap(), 100.0);
    assert!(parse_value("abc").is_err());
    assert_eq!(NumericParser::lenient().parse("abc").unwrap(), 0.0);
}

#[test]
fn test_formatting() {
    assert_eq!(format_resistance(10_000.0), "10.00 kΩ");
    assert_eq!(format_resistance(999.0), "999.00 Ω");
    assert_eq!(format_capacitance(1e-6), "1.00 μF");
    assert_eq!(format_resistance(parse_value("4.7k").unwrap()), "4.70 kΩ");
}

#[test]
fn test_design_inverting_amplifier() {
    let result = english_core()
        .design(
            "inverting amplifier",
            SelectionStrategy::Similarity,
            DesignTargets::new().with_gain(10.0),
        )
        .unwrap();

    assert_eq!(result.kind, ArchetypeKind::Inverting);
    assert_eq!(result.match_kind, MatchKind::Exact);
    assert_eq!(result.values.number("R1"), Some(10_000.0));
    assert_eq!(result.values.number("R2"), Some(100_000.0));
    assert_eq!(result.values.text("GainValue"), Some("-10.00"));
}

#[test]
fn test_design_non_inverting_amplifier() {
    let result = english_core()
        .design(
            "non-inverting amplifier",
            SelectionStrategy::Similarity,
            DesignTargets::new().with_gain(10.0),
        )
        .unwrap();

    assert_eq!(result.kind, ArchetypeKind::NonInverting);
    assert_eq!(result.values.number("R2"), Some(90_000.0));
}

#[test]
fn test_design_low_pass_filter() {
    let result = english_core()
        .design(
            "low-pass filter",
            SelectionStrategy::Similarity,
            DesignTargets::new().with_cutoff(1000.0),
        )
        .unwrap();

    let r = result.values.number("R").unwrap();
    assert!((r - 159.15).abs() < 0.01, "R = {}", r);
    assert!(result.values.contains_key("Formula"));
    assert!(!result.values.contains_key("GainFormula"));
}

#[test]
fn test_design_schmitt_trigger() {
    let core = english_core();
    let result = core
        .design(
            "schmitt trigger",
            SelectionStrategy::Similarity,
            DesignTargets::new().with_upper_threshold(5.0),
        )
        .unwrap();
    assert!(approx(result.values.number("R2").unwrap(), 5_000.0));

    let result = core.design(
        "schmitt trigger",
        SelectionStrategy::Similarity,
        DesignTargets::new().with_upper_threshold(15.0),
    );
    assert!(matches!(
        result,
        Err(DesignError::Formula(FormulaError::Computation {
            kind: ArchetypeKind::SchmittTrigger,
            source: ComputationError::Domain(_),
        }))
    ));
}

#[test]
fn test_missing_targets_come_from_config() {
    let result = english_core()
        .design("summing amplifier", SelectionStrategy::Similarity, DesignTargets::new())
        .unwrap();

    assert_eq!(result.targets.gain, Some(-10.0));
    assert_eq!(result.targets.gain2, Some(-10.0));
    assert_eq!(result.values.number("R1"), Some(1_000.0));
    assert_eq!(result.values.number("R2"), Some(1_000.0));
}

#[test]
fn test_compute_is_idempotent() {
    let core = english_core();
    let integrator = core.catalog().by_kind(ArchetypeKind::Integrator).unwrap();
    let targets = DesignTargets::new().with_time_constant(2e-3);

    let (_, first) = core.compute(integrator, targets.clone()).unwrap();
    let (_, second) = core.compute(integrator, targets).unwrap();
    assert_eq!(first, second);
    assert!(approx(first.number("C").unwrap(), 2e-7));
}

#[test]
fn test_unknown_family_is_unsupported() {
    let catalog = Catalog::from_file(&fixture_path("near_duplicates.json")).unwrap();
    let core = DesignCore::new(catalog, DesignConfig::default());
    let notch = core.catalog().get(3).unwrap();
    assert!(notch.kind.is_none());
    assert!(matches!(
        core.compute(notch, DesignTargets::new()),
        Err(DesignError::Formula(FormulaError::UnsupportedArchetype(_)))
    ));
}

#[test]
fn test_partial_config_merges_over_defaults() {
    let config = DesignConfig::load(&fixture_path("partial_config.json")).unwrap();
    assert_eq!(config.default_resistor, "4.7k");
    assert_eq!(config.language, Language::Tr);
    assert_eq!(config.default_capacitor, "1u");
    assert_eq!(config.default_gain, "10");

    let result = DesignCore::with_embedded_catalog(config)
        .design(
            "tersleyici yükselteç",
            SelectionStrategy::Similarity,
            DesignTargets::new().with_gain(2.0),
        )
        .unwrap();
    assert_eq!(result.archetype.name, "Tersleyici Yükselteç");
    assert!(approx(result.values.number("R1").unwrap(), 4_700.0));
    assert!(approx(result.values.number("R2").unwrap(), 9_400.0));
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = DesignConfig::load_or_default(&dir.path().join("opdesign.json")).unwrap();
    assert_eq!(config, DesignConfig::default());
}

#[test]
fn test_write_document_fills_every_placeholder() {
    let out = tempfile::tempdir().unwrap();
    let config = DesignConfig {
        templates_dir: fixture_path("templates"),
        output_dir: out.path().join("circuits"),
        ..DesignConfig::default()
    };
    let core = DesignCore::with_embedded_catalog(config);
    let result = core
        .design(
            "inverting amplifier",
            SelectionStrategy::Similarity,
            DesignTargets::new().with_gain(10.0),
        )
        .unwrap();

    let path = core.write_document(&result).unwrap();
    assert_eq!(path, out.path().join("circuits").join("inverting_amplifier.tex"));

    let document = std::fs::read_to_string(&path).unwrap();
    assert!(document.contains(r"R_1 = 10.0\\ k\\Ohm"));
    assert!(document.contains(r"R_2 = 100.0\\ k\\Ohm"));
    assert!(document.contains("= -10.00$"));
    assert!(!document.contains("<<"));
}

#[test]
fn test_turkish_document_uses_transliterated_template_name() {
    let config = DesignConfig {
        language: Language::Tr,
        templates_dir: fixture_path("templates"),
        ..DesignConfig::default()
    };
    let core = DesignCore::with_embedded_catalog(config);
    let result = core
        .design("tersleyici yükselteç", SelectionStrategy::Strict, DesignTargets::new())
        .unwrap();

    let document = core.render_document(&result).unwrap();
    assert!(document.contains(r"R_2 = 100.0\\ k\\Ohm"));
    assert!(!document.contains("<<"));
}

#[test]
fn test_missing_template_lists_available() {
    let config = DesignConfig {
        templates_dir: fixture_path("templates"),
        ..DesignConfig::default()
    };
    let core = DesignCore::with_embedded_catalog(config);
    let result = core
        .design("integrator", SelectionStrategy::Similarity, DesignTargets::new())
        .unwrap();

    match core.render_document(&result) {
        Err(DesignError::Template(TemplateError::NotFound { path, available })) => {
            assert!(path.ends_with("integrator.tex"));
            assert!(available.contains(&"inverting_amplifier.tex".to_string()));
            assert!(available.contains(&"low-pass_filter.tex".to_string()));
        }
        other => panic!("expected missing template, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_result_serializes_to_json() {
    let result = english_core()
        .design(
            "voltage follower",
            SelectionStrategy::Similarity,
            DesignTargets::new(),
        )
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["kind"], "voltage_follower");
    assert_eq!(json["archetype"]["circuit_type"], "Voltage Follower");
    assert_eq!(json["values"]["GainValue"]["value"], "1.00");
}
