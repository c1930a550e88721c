//! Cursor extraction for the profile media endpoint.
//!
//! Unlike Link-header pagination, the cursor here rides inside the JSON body:
//! `graphql.user.edge_owner_to_timeline_media.page_info` carries
//! `has_next_page` and `end_cursor`. The upstream has been observed returning
//! `has_next_page: false` together with a non-empty `end_cursor`, and
//! (rarely) `has_next_page: true` with an empty cursor — both mean "stop".

use crate::types::ProfileMediaResponse;

/// Returns the cursor for the next page, or `None` when the last page has
/// been reached.
///
/// `None` when:
/// - `has_next_page` is false,
/// - `end_cursor` is absent or empty (a cycling empty cursor would loop
///   forever).
#[must_use]
pub fn next_cursor(response: &ProfileMediaResponse) -> Option<String> {
    let page_info = &response
        .graphql
        .user
        .edge_owner_to_timeline_media
        .page_info;

    if !page_info.has_next_page {
        return None;
    }

    page_info
        .end_cursor
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
}
