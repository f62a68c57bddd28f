/// Marker substituted for any field the detail page does not expose
pub const UNAVAILABLE: &str = "N/A";

/// One harvested listing, written once to the record sink
///
/// Fields are kept as strings exactly as the detail page presents them; the
/// `timestamp` is stamped by the harvest pool at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub address: String,
    pub listed_price: String,
    /// External identifier (MLS number or equivalent)
    pub mls_id: String,
    pub days_on_market: String,
    pub views: String,
    pub saves: String,
    pub url: String,
    pub timestamp: String,
}

/// Extracts structured fields from a listing's detail page.
///
/// Implementations must be pure and total: a missing field degrades to
/// [`UNAVAILABLE`], never an error. The returned record carries an empty
/// timestamp; the harvest pool stamps it.
pub trait FieldExtractor: Send + Sync {
    fn extract(&self, html: &str, url: &str) -> ListingRecord;
}
