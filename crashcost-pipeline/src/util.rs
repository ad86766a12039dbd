/// Extract a short type name from the full module path.
///
/// Given `"crashcost_pipeline::components::intact_filter::IntactFilter"`,
/// returns `"IntactFilter"`. Used for stage names in logs.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
