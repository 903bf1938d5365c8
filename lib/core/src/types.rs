use serde::Serialize;

/// A validated pagination window: `page >= 1`, `1 <= limit <= 100`.
///
/// Construction goes through each module's validation layer; holders of
/// a `PageParams` can assume the bounds hold.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl PageParams {
    /// Row offset for the underlying store query. Saturates instead of
    /// overflowing: an absurdly large page yields an empty window, not
    /// a panic or a wrapped offset.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Pagination envelope returned alongside list data.
///
/// `total_pages` is recomputed from a fresh count on every call — there
/// is no caching across requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl Page {
    pub fn new(params: &PageParams, total_items: u64) -> Self {
        Self {
            page: params.page,
            limit: params.limit,
            total_items,
            total_pages: total_items.div_ceil(params.limit),
        }
    }
}

/// A page of results plus its pagination envelope.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Page,
}

/// Generate a new 24-character lowercase hex record key.
pub fn new_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    hex[..24].to_string()
}

/// Check a resource id against the store key format: exactly 24 hex chars.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Current time as a fixed-width RFC 3339 string (microseconds, UTC).
///
/// Fixed width keeps lexicographic order equal to chronological order,
/// which the list queries rely on for `ORDER BY created_at DESC`.
pub fn now_rfc3339() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
