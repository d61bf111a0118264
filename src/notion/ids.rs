//! Notion object id helpers.
//!
//! Notion ids are UUIDs, accepted with or without dashes. The API and this
//! crate use the compact 32-character form in request paths.

use url::form_urlencoded::byte_serialize;

use super::ApiError;

/// Length of a compact id.
pub const ID_LEN: usize = 32;

/// Removes the dashes from an id.
///
/// ```
/// use notion_gateway::notion::ids::clean_id;
///
/// assert_eq!(
///     clean_id("c2f9e9e8-5e5c-4b3c-8a9d-1b3e8a9b3c1e"),
///     "c2f9e9e85e5c4b3c8a9d1b3e8a9b3c1e"
/// );
/// ```
#[must_use]
pub fn clean_id(id: &str) -> String {
    id.replace('-', "")
}

/// Returns true if `id`, once cleaned, is 32 lowercase hex characters.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    let cleaned = clean_id(id);
    cleaned.len() == ID_LEN
        && cleaned
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Encodes an id as exactly one path segment.
///
/// Every byte other than ASCII alphanumerics, `*`, `-`, `.` and `_` is
/// percent-encoded, so `/`, `?`, `#` and `%` stay inside the segment. Ids are taken as raw values: an
/// already encoded id is encoded again.
///
/// ```
/// use notion_gateway::notion::ids::path_segment;
///
/// assert_eq!(path_segment("a/b c").unwrap(), "a%2Fb%20c");
/// assert!(path_segment("..").is_err());
/// ```
///
/// # Errors
///
/// Returns [`ApiError::InvalidId`] for an empty id and for `.` or `..`,
/// which URL resolution would turn into a different path.
pub fn path_segment(id: &str) -> Result<String, ApiError> {
    let reason = match id {
        "" => "id is empty",
        "." | ".." => "id is a relative path segment",
        _ => return Ok(byte_serialize(id.as_bytes()).collect::<String>().replace('+', "%20")),
    };
    Err(ApiError::InvalidId {
        id: id.to_string(),
        reason,
    })
}

/// Cleans an id and encodes it as one path segment.
pub(crate) fn id_segment(id: &str) -> Result<String, ApiError> {
    path_segment(&clean_id(id))
}
