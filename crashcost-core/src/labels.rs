//! Label canonicalization and synonym mapping.
//!
//! The two detectors emit free-text labels ("Front Door", "tail-light",
//! "Paint Chip"). Everything downstream works on a closed vocabulary, so
//! labels are canonicalized once and mapped through fixed synonym tables.
//! Mapping never fails: unknown labels fall back to a default with a
//! warning rather than poisoning the request.

/// Trim, lowercase, and replace spaces/hyphens with underscores.
pub fn canonicalize(label: &str) -> String {
    label.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Map a detected part label onto the rule-table part vocabulary.
///
/// Exact synonyms first, then substring heuristics, then a warned default.
pub fn map_part(label: &str) -> &'static str {
    let key = canonicalize(label);
    let mapped = match key.as_str() {
        "front_door" | "door" | "back_door" | "rear_door" | "mirror" => Some("Door"),
        "front_bumper" | "bumper" | "grille" => Some("Front bumper"),
        "back_bumper" | "rear_bumper" => Some("Rear bumper"),
        "fender" | "front_fender" => Some("Front fender"),
        "rear_fender" | "quarter_panel" => Some("Rear fender"),
        "hood" => Some("Hood"),
        "roof" => Some("Roof"),
        "trunk" => Some("Trunk"),
        "tail_light" | "taillight" => Some("Taillight"),
        "headlight" => Some("Headlight"),
        "front_wheel" | "back_wheel" | "wheel" => Some("Wheel"),
        "front_window" | "back_window" | "window" => Some("Window"),
        "windshield" | "back_windshield" => Some("Windshield"),
        _ => None,
    };
    if let Some(part) = mapped {
        return part;
    }
    if key.contains("door") {
        return "Door";
    }
    if key.contains("bumper") {
        return "Front bumper";
    }
    if key.contains("fender") || key.contains("quarter") {
        return "Front fender";
    }
    if key.contains("wheel") {
        return "Wheel";
    }
    if key.contains("window") {
        return "Window";
    }
    if key.contains("light") {
        return "Headlight";
    }
    log::warn!("unknown part '{}', defaulting to Door", label);
    "Door"
}

/// Map a damage label onto the rule-table damage vocabulary.
///
/// Returns `None` for "intact"; the caller must skip pricing. Unknown
/// non-intact labels map to "Dent" with a warning.
pub fn map_damage_type(label: &str) -> Option<&'static str> {
    let key = canonicalize(label);
    match key.as_str() {
        "dent" => Some("Dent"),
        "scratch" | "scrape" | "paint_chip" | "flaking" | "corrosion" => Some("Scrape"),
        "crack" | "cracked" => Some("Crack"),
        "broken_part" | "missing_part" | "missing" => Some("Missing"),
        "intact" => None,
        _ => {
            log::warn!("unknown damage_type '{}', defaulting to Dent", label);
            Some("Dent")
        }
    }
}
