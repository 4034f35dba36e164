// Wire format of the shareable `page` query parameter. The controller's
// URL push and URL pull paths both go through here, but never through
// each other.

/// Replace-style query string for the current page.
pub fn page_query(page: u32) -> String {
    format!("?page={page}")
}

/// Page carried by a query string. Missing, zero or unparsable values
/// resolve to page 1; the caller still clamps to the chapter bounds.
pub fn page_from_query(query: &str) -> u32 {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}
