//! Field-level access policy tables.
//!
//! Two fixed sets drive the second tier of the access check: fields that
//! can never be edited regardless of entity access, and fields that can
//! never be viewed. The sets are static so membership is an O(1) hash
//! lookup; this check runs for every field of every listed row.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Fields that are never editable, even by the owner or an administrator.
///
/// Identity, ownership, hierarchy links, the computed size, the kind, the
/// underlying-file reference, and the grant lists are all maintained by
/// dedicated operations, never by direct field edits.
static NON_EDITABLE_FIELDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "id",
        "kind",
        "parent_id",
        "root_id",
        "owner_id",
        "size",
        "file_id",
        "created_at",
        "changed_at",
        "grants_view",
        "grants_author",
        "grants_disabled",
    ])
});

/// Fields that are never viewable through listings or the API.
static NON_VIEWABLE_FIELDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from(["uuid", "langcode", "grants_disabled"])
});

/// Whether a field may be edited, assuming entity-level access was granted.
pub fn field_editable(field: &str) -> bool {
    !NON_EDITABLE_FIELDS.contains(field)
}

/// Whether a field may be viewed, assuming entity-level access was granted.
pub fn field_viewable(field: &str) -> bool {
    !NON_VIEWABLE_FIELDS.contains(field)
}
