//! Unmatched-attendee report.

/// Case-insensitive ascending; names equal ignoring case keep input order.
pub fn sorted_unmatched(names: &[String]) -> Vec<String> {
    let mut sorted = names.to_vec();
    sorted.sort_by_cached_key(|n| n.to_lowercase());
    sorted
}

/// Render the report text: threshold header, blank line, section label,
/// then one sorted name per line.
pub fn render_unmatched_report(unmatched: &[String], match_threshold: u8) -> String {
    let mut out = format!("Fuzzy Matching Threshold: {match_threshold}\n\n");
    out.push_str("Unmatched ZOOM Attendees:\n");
    for name in sorted_unmatched(unmatched) {
        out.push_str(&name);
        out.push('\n');
    }
    out
}
