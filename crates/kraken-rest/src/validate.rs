//! Local argument checks run before a request is sent

use crate::error::{RestError, RestResult};

/// Maximum number of ids accepted by the query endpoints
pub const MAX_IDS_PER_QUERY: usize = 20;

/// Reject id lists longer than [`MAX_IDS_PER_QUERY`]
///
/// Entries may themselves be comma lists, so the count is taken over the
/// ids that end up in the joined value.
pub fn check_id_list<S: AsRef<str>>(field: &'static str, ids: &[S]) -> RestResult<()> {
    let count = ids
        .iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .filter(|id| !id.trim().is_empty())
        .count();
    if count > MAX_IDS_PER_QUERY {
        return Err(RestError::validation(field, "too many"));
    }
    Ok(())
}

/// Reject a range that has a start but no end
pub fn check_range(start: Option<u64>, end: Option<u64>) -> RestResult<()> {
    if start.is_some() && end.is_none() {
        return Err(RestError::validation("end", "required when start is given"));
    }
    Ok(())
}

/// Join ids into the comma list the API expects
pub fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}
