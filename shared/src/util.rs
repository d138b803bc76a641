/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Clamp a 1-based page request to sane bounds and return `(page, per_page, offset)`.
pub fn page_window(page: Option<u32>, per_page: Option<u32>, default: u32, max: u32) -> (u32, u32, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(default).clamp(1, max.max(1));
    let offset = (page as i64 - 1) * per_page as i64;
    (page, per_page, offset)
}
