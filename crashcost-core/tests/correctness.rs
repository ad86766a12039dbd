//! Correctness tests for crashcost-core.
//!
//! Validates that:
//! 1. Fusion is part-keyed: one output per detected part, always
//! 2. Greedy matching honors the IoU threshold and confidence contest
//! 3. Severity scoring is a pure function of its inputs
//! 4. Determinism: the same detections always produce the same output

use crashcost_core::fusion::{fuse, RawDetection};
use crashcost_core::severity::{score, Severity};

const IOU_THRESHOLD: f64 = 0.1;

fn det(label: &str, confidence: f64, bbox: [f64; 4]) -> RawDetection {
    RawDetection {
        label: label.to_string(),
        confidence,
        bbox: bbox.into(),
    }
}

/// A small scene: door and front bumper, with a dent on the door and a
/// scratch that overlaps nothing.
fn sample_parts() -> Vec<RawDetection> {
    vec![
        det("door", 0.91, [100.0, 200.0, 300.0, 400.0]),
        det("front_bumper", 0.84, [50.0, 420.0, 350.0, 520.0]),
    ]
}

fn sample_damages() -> Vec<RawDetection> {
    vec![
        det("dent", 0.72, [150.0, 250.0, 260.0, 360.0]),
        det("scratch", 0.95, [900.0, 900.0, 950.0, 950.0]),
    ]
}

#[test]
fn one_output_per_part() {
    let fused = fuse(&sample_parts(), &sample_damages(), IOU_THRESHOLD);
    assert_eq!(fused.len(), 2);
    assert_eq!(fused[0].part, "door");
    assert_eq!(fused[1].part, "front_bumper");
}

#[test]
fn dent_lands_on_door_and_bumper_stays_intact() {
    let fused = fuse(&sample_parts(), &sample_damages(), IOU_THRESHOLD);
    assert_eq!(fused[0].damage_type, "dent");
    assert_eq!(fused[0].confidence, 0.72);
    assert!(fused[1].is_intact());
    assert_eq!(fused[1].confidence, 0.84);
}

#[test]
fn unmatched_damage_does_not_become_an_output_record() {
    // The stray scratch overlaps neither part; it must vanish rather
    // than surface as a partless detection.
    let fused = fuse(&sample_parts(), &sample_damages(), IOU_THRESHOLD);
    assert!(fused.iter().all(|d| d.damage_type != "scratch"));
}

#[test]
fn fused_scene_scores_deterministically() {
    let fused = fuse(&sample_parts(), &sample_damages(), IOU_THRESHOLD);
    let severities: Vec<Severity> = fused
        .iter()
        .filter(|d| !d.is_intact())
        .map(|d| score(&d.damage_type, d.confidence, None))
        .collect();
    assert_eq!(severities, vec![Severity::Moderate]);
}

#[test]
fn full_core_path_is_idempotent() {
    let run = || {
        let mut fused = fuse(&sample_parts(), &sample_damages(), IOU_THRESHOLD);
        for d in &mut fused {
            if !d.is_intact() {
                d.severity = Some(score(&d.damage_type, d.confidence, None));
            }
        }
        serde_json::to_string(&fused).unwrap()
    };
    assert_eq!(run(), run());
}
