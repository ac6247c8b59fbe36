/// Project, story and scene ids are opaque strings (UUID v4 when generated).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh entity id.
pub fn new_entity_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}

/// Use the caller-supplied id when present (and non-blank), otherwise
/// generate a fresh one.
///
/// Lets a caller pre-compute an id and reference the node immediately after
/// dispatching the action that creates it.
pub fn id_or_new(id: Option<EntityId>) -> EntityId {
    match id {
        Some(id) if !id.trim().is_empty() => id,
        _ => new_entity_id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplied_id_is_kept() {
        assert_eq!(id_or_new(Some("story-1".to_string())), "story-1");
    }

    #[test]
    fn blank_id_is_replaced() {
        let id = id_or_new(Some("  ".to_string()));
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(new_entity_id(), new_entity_id());
    }
}
