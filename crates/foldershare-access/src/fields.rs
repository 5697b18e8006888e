//! Two-tier field-level access: entity access first, then the static
//! field policy from the entity crate.

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_entity::fields::{field_editable, field_viewable};
use foldershare_entity::item::Item;

use crate::actor::Actor;

/// Fail with `Forbidden` if the named field may never be edited.
///
/// Applies to both schema fields and keys in the extensible bag. Entity
/// access must already have been granted; this is the second tier.
pub fn require_editable(field: &str) -> AppResult<()> {
    if field_editable(field) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "The field '{field}' cannot be edited"
        )))
    }
}

/// Serialize an entity for a viewer, dropping never-viewable fields.
///
/// Administrators see the full record. For everyone else, non-viewable
/// top-level fields and the disabled-grant list are removed.
pub fn viewable_json(item: &Item, actor: &Actor) -> AppResult<serde_json::Value> {
    let mut value = serde_json::to_value(item)?;
    if actor.is_admin() {
        return Ok(value);
    }
    if let Some(obj) = value.as_object_mut() {
        obj.retain(|key, _| field_viewable(key));
        // The disabled-grant list nests under "grants".
        if let Some(grants) = obj.get_mut("grants").and_then(|g| g.as_object_mut()) {
            grants.remove("disabled");
        }
        if let Some(extra) = obj.get_mut("extra").and_then(|e| e.as_object_mut()) {
            extra.retain(|key, _| field_viewable(key));
        }
    }
    Ok(value)
}
