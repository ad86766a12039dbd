use std::sync::Arc;

use crashcost_core::fusion::RawDetection;
use crashcost_core::severity::Severity;
use crashcost_pipeline::candidate_pipeline::CandidatePipeline;
use crashcost_pipeline::components::fusion_source::FusionSource;
use crashcost_pipeline::components::intact_filter::IntactFilter;
use crashcost_pipeline::components::severity_hydrator::SeverityHydrator;
use crashcost_pipeline::components::severity_priority_scorer::SeverityPriorityScorer;
use crashcost_pipeline::filter::{Filter, FilterResult};
use crashcost_pipeline::hydrator::Hydrator;
use crashcost_pipeline::pipelines::damage_estimate::DamageEstimatePipeline;
use crashcost_pipeline::rules::RuleTable;
use crashcost_pipeline::scorer::Scorer;
use crashcost_pipeline::source::Source;
use crashcost_pipeline::types::{DamageCandidate, EstimateQuery};

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

const SAMPLE_RULES: &str = "\
Car_Type,Part,Damage_Type,Severity,New_Part_Cost,Used_Part_Cost,Labor_Hours
Super,Door,Dent,moderate,3500,1750,5.4
Super,Door,Dent,severe,4200,2100,7.0
Super,Front bumper,Scrape,moderate,900,450,2.0
Super,Front bumper,Scrape,minor,400,200,1.0
";

fn rule_table() -> Arc<RuleTable> {
    Arc::new(RuleTable::from_reader(SAMPLE_RULES.as_bytes()).unwrap())
}

fn det(label: &str, confidence: f64, bbox: [f64; 4]) -> RawDetection {
    RawDetection {
        label: label.to_string(),
        confidence,
        bbox: bbox.into(),
    }
}

/// A three-part scene: dented door, scraped bumper, untouched hood.
fn sample_parts() -> Vec<RawDetection> {
    vec![
        det("door", 0.91, [100.0, 200.0, 300.0, 400.0]),
        det("front_bumper", 0.84, [50.0, 420.0, 350.0, 520.0]),
        det("hood", 0.90, [400.0, 0.0, 600.0, 150.0]),
    ]
}

fn sample_damages() -> Vec<RawDetection> {
    vec![
        det("dent", 0.72, [150.0, 250.0, 260.0, 360.0]),
        det("scratch", 0.95, [60.0, 430.0, 200.0, 500.0]),
    ]
}

fn make_query(request_id: &str) -> EstimateQuery {
    EstimateQuery::new(request_id)
}

fn make_pipeline() -> DamageEstimatePipeline {
    DamageEstimatePipeline::new(sample_parts(), sample_damages(), rule_table())
}

// ---------------------------------------------------------------------------
// Source tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fusion_source_produces_one_candidate_per_part() {
    let source = FusionSource::new(sample_parts(), sample_damages());
    let candidates = source.get_candidates(&make_query("test-src")).await.unwrap();

    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates[0].part, "door");
    assert_eq!(candidates[0].damage_type, "dent");
    // min(part 0.91, damage 0.72)
    assert_eq!(candidates[0].confidence, 0.72);
    assert_eq!(candidates[1].damage_type, "scratch");
    assert!(candidates[2].is_intact());
}

#[tokio::test]
async fn fusion_source_disabled_for_empty_parts() {
    let source = FusionSource::new(vec![], sample_damages());
    assert!(!source.enable(&make_query("test-empty")));
}

// ---------------------------------------------------------------------------
// Hydrator tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn severity_hydrator_scores_damaged_candidates() {
    let source = FusionSource::new(sample_parts(), sample_damages());
    let query = make_query("test-sev");
    let mut candidates = source.get_candidates(&query).await.unwrap();

    let hydrator = SeverityHydrator;
    let hydrated = hydrator.hydrate(&query, &candidates).await.unwrap();
    for (c, h) in candidates.iter_mut().zip(hydrated) {
        hydrator.update(c, h);
    }

    // dent at 0.72 and scratch at min(0.84, 0.95)=0.84 are both moderate
    assert_eq!(candidates[0].severity, Some(Severity::Moderate));
    assert_eq!(candidates[1].severity, Some(Severity::Moderate));
    assert_eq!(candidates[2].severity, None);
}

#[tokio::test]
async fn severity_hydrator_preserves_caller_override() {
    let query = make_query("test-override");
    let candidates = vec![DamageCandidate {
        id: "det-0".into(),
        part: "door".into(),
        damage_type: "dent".into(),
        confidence: 0.9,
        severity: Some(Severity::Minor),
        ..DamageCandidate::default()
    }];

    let hydrator = SeverityHydrator;
    let hydrated = hydrator.hydrate(&query, &candidates).await.unwrap();
    // dent at 0.9 would score severe; the override must win
    assert_eq!(hydrated[0].severity, Some(Severity::Minor));
}

// ---------------------------------------------------------------------------
// Filter tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn intact_filter_partitions_candidates() {
    let source = FusionSource::new(sample_parts(), sample_damages());
    let query = make_query("test-filter");
    let candidates = source.get_candidates(&query).await.unwrap();

    let FilterResult { kept, removed } = IntactFilter.filter(&query, candidates).await.unwrap();
    assert_eq!(kept.len(), 2);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].part, "hood");
}

#[tokio::test]
async fn intact_filter_disabled_by_include_intact() {
    let mut query = make_query("test-include");
    query.include_intact = true;
    assert!(!Filter::<EstimateQuery, DamageCandidate>::enable(
        &IntactFilter,
        &query
    ));
}

// ---------------------------------------------------------------------------
// Scorer tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn severity_priority_scorer_weights_by_severity() {
    let query = make_query("test-score");
    let candidates = vec![
        DamageCandidate {
            confidence: 0.5,
            severity: Some(Severity::Severe),
            damage_type: "crack".into(),
            ..DamageCandidate::default()
        },
        DamageCandidate {
            confidence: 0.9,
            severity: Some(Severity::Minor),
            damage_type: "scratch".into(),
            ..DamageCandidate::default()
        },
    ];

    let scorer = SeverityPriorityScorer::default();
    let scored = scorer.score(&query, &candidates).await.unwrap();
    assert_eq!(scored[0].priority_score, Some(1.5));
    assert_eq!(scored[1].priority_score, Some(0.9));
}

// ---------------------------------------------------------------------------
// Full pipeline tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_estimate_prices_known_rules() {
    let report = make_pipeline().estimate(make_query("test-e2e")).await.unwrap();

    assert_eq!(report.line_items.len(), 2);
    assert_eq!(report.filtered_count, 1);

    // Scraped bumper outranks the dented door (0.84 x 2 vs 0.72 x 2).
    let bumper = &report.line_items[0];
    assert_eq!(bumper.part, "Front bumper");
    assert_eq!(bumper.damage_type, "Scrape");
    assert_eq!(bumper.severity, Severity::Moderate);
    assert_eq!(bumper.labor_cost, 300.0);
    assert_eq!(bumper.total_new, 1200.0);
    assert_eq!(bumper.total_used, 750.0);

    let door = &report.line_items[1];
    assert_eq!(door.part, "Door");
    assert_eq!(door.damage_type, "Dent");
    assert_eq!(door.labor_hours, 5.4);
    assert_eq!(door.labor_cost, 810.0);
    assert_eq!(door.total_new, 4310.0);
    assert_eq!(door.total_used, 2560.0);

    assert_eq!(report.totals.likely, 5510.0);
    assert_eq!(report.totals.min, 3310.0);
    assert_eq!(report.totals.max, 6612.0);
}

#[tokio::test]
async fn used_parts_preference_switches_totals() {
    let mut query = make_query("test-used");
    query.use_oem_parts = false;
    let report = make_pipeline().estimate(query).await.unwrap();

    assert_eq!(report.totals.likely, 3310.0);
    assert_eq!(report.totals.min, 3310.0);
    assert_eq!(report.totals.max, 3972.0);
}

#[tokio::test]
async fn no_detections_yield_zero_totals() {
    let pipeline = DamageEstimatePipeline::new(vec![], vec![], rule_table());
    let report = pipeline.estimate(make_query("test-zero")).await.unwrap();

    assert!(report.line_items.is_empty());
    assert_eq!(report.totals.min, 0.0);
    assert_eq!(report.totals.likely, 0.0);
    assert_eq!(report.totals.max, 0.0);
}

#[tokio::test]
async fn all_intact_scene_yields_zero_totals() {
    let pipeline = DamageEstimatePipeline::new(sample_parts(), vec![], rule_table());
    let report = pipeline.estimate(make_query("test-intact")).await.unwrap();

    assert!(report.line_items.is_empty());
    assert_eq!(report.filtered_count, 3);
    assert_eq!(report.totals.likely, 0.0);
}

#[tokio::test]
async fn include_intact_keeps_candidates_without_pricing_them() {
    let pipeline = make_pipeline();
    let mut query = make_query("test-keep-intact");
    query.include_intact = true;

    let outcome = pipeline.run(query.clone()).await.unwrap();
    assert_eq!(outcome.selected.len(), 3);
    assert_eq!(outcome.filtered_count, 0);
    let intact: Vec<_> = outcome.selected.iter().filter(|c| c.is_intact()).collect();
    assert_eq!(intact.len(), 1);
    assert!(intact[0].line.is_none());

    // Totals are unchanged by the passenger intact candidate.
    let report = pipeline.estimate(query).await.unwrap();
    assert_eq!(report.line_items.len(), 2);
    assert_eq!(report.totals.likely, 5510.0);
}

#[tokio::test]
async fn unknown_combination_prices_via_fallback() {
    let parts = vec![det("roof", 0.9, [0.0, 0.0, 100.0, 100.0])];
    let damages = vec![det("crack", 0.9, [10.0, 10.0, 90.0, 90.0])];
    let pipeline = DamageEstimatePipeline::new(parts, damages, rule_table());
    let report = pipeline.estimate(make_query("test-fallback")).await.unwrap();

    assert_eq!(report.line_items.len(), 1);
    let item = &report.line_items[0];
    assert_eq!(item.labor_hours, 3.0);
    assert_eq!(item.part_cost_new, 1500.0);
    assert!(item.total_new > 0.0);
}

#[tokio::test]
async fn blank_car_type_defaults_and_prices_from_default_tier() {
    let pipeline = make_pipeline();
    let mut query = make_query("test-car-type");
    query.car_type = "  ".into();
    let report = pipeline.estimate(query).await.unwrap();
    assert_eq!(report.totals.likely, 5510.0);
}

#[tokio::test]
async fn caller_override_survives_the_full_pipeline() {
    // A dent at 0.9 would score severe; the caller insists on minor.
    let parts = vec![det("door", 0.95, [0.0, 0.0, 100.0, 100.0])];
    let damages = vec![det("dent", 0.9, [10.0, 10.0, 90.0, 90.0])];
    let pipeline = DamageEstimatePipeline::with_overrides(
        parts,
        damages,
        vec![Some(Severity::Minor)],
        rule_table(),
    );
    let report = pipeline.estimate(make_query("test-e2e-override")).await.unwrap();

    assert_eq!(report.line_items.len(), 1);
    assert_eq!(report.line_items[0].severity, Severity::Minor);
}

#[tokio::test]
async fn repeated_runs_are_byte_identical() {
    let pipeline = make_pipeline();
    let first = pipeline.estimate(make_query("test-idem")).await.unwrap();
    let second = pipeline.estimate(make_query("test-idem")).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
