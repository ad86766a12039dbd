use std::env;
use std::process;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crashcost_core::fusion::RawDetection;
use crashcost_core::severity::parse_override;
use crashcost_core::thresholds::{DEFAULT_CAR_TYPE, DEFAULT_IOU_THRESHOLD, DEFAULT_LABOR_RATE};
use crashcost_pipeline::pipelines::damage_estimate::DamageEstimatePipeline;
use crashcost_pipeline::rules::RuleTable;
use crashcost_pipeline::types::{EstimateQuery, EstimateReport, LineItem};

const DEFAULT_RULES_PATH: &str = "fixtures/repair_rules.csv";

// ---------------------------------------------------------------------------
// Input contract
// ---------------------------------------------------------------------------

/// Detection file produced by the two inference passes for one image.
#[derive(Deserialize)]
struct DetectionsFile {
    #[serde(default)]
    image_id: Option<String>,
    parts: Vec<RawDetectionJson>,
    #[serde(default)]
    damages: Vec<RawDetectionJson>,
}

/// A detection as the models emit it; `severity` is an optional caller
/// override carried through to scoring.
#[derive(Deserialize)]
struct RawDetectionJson {
    label: String,
    confidence: f64,
    bbox: [f64; 4],
    #[serde(default)]
    severity: Option<String>,
}

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EstimateJson {
    generated_at: String,
    image_id: Option<String>,
    car_type: String,
    labor_rate: f64,
    use_oem_parts: bool,
    pipeline_ms: u128,
    line_items: Vec<LineItemJson>,
    totals: TotalsJson,
    filtered_count: usize,
}

#[derive(Serialize)]
struct LineItemJson {
    part: String,
    damage_type: String,
    severity: String,
    labor_hours: f64,
    labor_cost: f64,
    part_cost_new: f64,
    part_cost_used: f64,
    total_new: f64,
    total_used: f64,
}

#[derive(Serialize)]
struct TotalsJson {
    min: f64,
    likely: f64,
    max: f64,
}

fn line_item_json(item: &LineItem) -> LineItemJson {
    LineItemJson {
        part: item.part.clone(),
        damage_type: item.damage_type.clone(),
        severity: item.severity.to_string(),
        labor_hours: item.labor_hours,
        labor_cost: item.labor_cost,
        part_cost_new: item.part_cost_new,
        part_cost_used: item.part_cost_used,
        total_new: item.total_new,
        total_used: item.total_used,
    }
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

fn print_report(report: &EstimateReport, car_type: &str, labor_rate: f64, use_oem_parts: bool) {
    println!();
    println!("  ╔══════════════════════════════════════════════════════════════╗");
    println!("  ║              CRASHCOST — Repair Cost Estimate                ║");
    println!("  ╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "  Car type: {}   Labor rate: ${:.2}/h   Parts: {}",
        car_type,
        labor_rate,
        if use_oem_parts { "new (OEM)" } else { "used" }
    );
    println!();

    if report.line_items.is_empty() {
        println!("  No damage detected. Nothing to repair.");
    } else {
        println!("  {:─<64}", "");
        for item in &report.line_items {
            println!(
                "  {:<14} {:<8} {:<9} {:>5.1} h  new ${:>9.2}  used ${:>9.2}",
                item.part,
                item.damage_type,
                item.severity,
                item.labor_hours,
                item.total_new,
                item.total_used
            );
        }
        println!("  {:─<64}", "");
    }

    println!();
    println!(
        "  Totals:  min ${:.2}   likely ${:.2}   max ${:.2}",
        report.totals.min, report.totals.likely, report.totals.max
    );
    println!();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn usage() -> ! {
    eprintln!("Usage: crashcost-server <detections.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --rules PATH     Pricing rules CSV (default: {DEFAULT_RULES_PATH})");
    eprintln!("  --labor-rate N   Hourly labor rate (default: {DEFAULT_LABOR_RATE})");
    eprintln!("  --car-type T     Car type segment (default: {DEFAULT_CAR_TYPE})");
    eprintln!("  --iou T          IoU threshold for fusion (default: {DEFAULT_IOU_THRESHOLD})");
    eprintln!("  --used           Price with used parts instead of new (OEM)");
    eprintln!("  --include-intact Keep undamaged parts in the output");
    eprintln!("  --json           Output as JSON instead of formatted text");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  crashcost-server fixtures/sample_detections.json");
    eprintln!("  crashcost-server fixtures/sample_detections.json --used --json");
    process::exit(1);
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }

    let input_path = args[0].clone();
    let mut rules_path = DEFAULT_RULES_PATH.to_string();
    let mut labor_rate = DEFAULT_LABOR_RATE;
    let mut car_type = DEFAULT_CAR_TYPE.to_string();
    let mut iou_threshold = DEFAULT_IOU_THRESHOLD;
    let mut use_oem_parts = true;
    let mut include_intact = false;
    let mut as_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rules" => {
                i += 1;
                rules_path = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("Error: --rules requires a path");
                    process::exit(1);
                });
            }
            "--labor-rate" => {
                i += 1;
                labor_rate = args
                    .get(i)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("Error: --labor-rate requires a number");
                        process::exit(1);
                    });
            }
            "--car-type" => {
                i += 1;
                car_type = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("Error: --car-type requires a value");
                    process::exit(1);
                });
            }
            "--iou" => {
                i += 1;
                iou_threshold = args
                    .get(i)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("Error: --iou requires a number");
                        process::exit(1);
                    });
            }
            "--used" => use_oem_parts = false,
            "--include-intact" => include_intact = true,
            "--json" => as_json = true,
            other => {
                eprintln!("Unknown argument: {}", other);
                usage();
            }
        }
        i += 1;
    }

    let raw = match std::fs::read_to_string(&input_path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error reading '{}': {}", input_path, e);
            process::exit(1);
        }
    };
    let detections: DetectionsFile = match serde_json::from_str(&raw) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error parsing '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    // Rule table load failure is fatal; the shared table caches the
    // outcome so this is the only place it can fail.
    let table = match RuleTable::shared(&rules_path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let to_raw = |d: &RawDetectionJson| RawDetection {
        label: d.label.clone(),
        confidence: d.confidence,
        bbox: d.bbox.into(),
    };
    let parts: Vec<RawDetection> = detections.parts.iter().map(to_raw).collect();
    let damages: Vec<RawDetection> = detections.damages.iter().map(to_raw).collect();

    // Caller-supplied severity on a part detection overrides scoring.
    let overrides = detections
        .parts
        .iter()
        .map(|d| {
            let requested = d.severity.as_deref()?;
            let parsed = parse_override(requested);
            if parsed.is_none() {
                log::warn!(
                    "ignoring invalid severity override '{}' on part '{}'",
                    requested,
                    d.label
                );
            }
            parsed
        })
        .collect();

    let pipeline = DamageEstimatePipeline::with_overrides(parts, damages, overrides, table);
    let query = EstimateQuery {
        request_id: format!("cli-{}", Utc::now().timestamp_millis()),
        labor_rate,
        use_oem_parts,
        car_type: car_type.clone(),
        include_intact,
        iou_threshold,
    };

    let started = Instant::now();
    let report = match pipeline.estimate(query).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let pipeline_ms = started.elapsed().as_millis();

    if as_json {
        let out = EstimateJson {
            generated_at: Utc::now().to_rfc3339(),
            image_id: detections.image_id,
            car_type,
            labor_rate,
            use_oem_parts,
            pipeline_ms,
            line_items: report.line_items.iter().map(line_item_json).collect(),
            totals: TotalsJson {
                min: report.totals.min,
                likely: report.totals.likely,
                max: report.totals.max,
            },
            filtered_count: report.filtered_count,
        };
        println!("{}", serde_json::to_string_pretty(&out).unwrap());
    } else {
        print_report(&report, &car_type, labor_rate, use_oem_parts);
    }
}
