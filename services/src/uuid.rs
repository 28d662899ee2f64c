use uuid::Uuid;

/// Deterministic UUIDv5 from an arbitrary string id.
///
/// The same input always yields the same UUID, which makes derived ids
/// safe to use as overwrite keys in external stores.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(stable_uuid("q-123"), stable_uuid("q-123"));
        assert_ne!(stable_uuid("q-123"), stable_uuid("q-124"));
    }
}
