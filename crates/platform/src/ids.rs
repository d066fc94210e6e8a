use std::cell::Cell;

/// Source of opaque unique identifiers
///
/// Editors stamp each condition they create with an id from this generator.
pub trait UniqueIdGenerator {
    fn next_id(&self) -> String;
}

impl<G: UniqueIdGenerator + ?Sized> UniqueIdGenerator for &G {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}

/// Random version 4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl UniqueIdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-N` identifiers, counting from 1
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl UniqueIdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("filter");
        assert_eq!(ids.next_id(), "filter-1");
        assert_eq!(ids.next_id(), "filter-2");
        assert_eq!(SequentialIds::default().next_id(), "id-1");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let generator = UuidGenerator;
        let ids: HashSet<String> = (0..100).map(|_| generator.next_id()).collect();
        assert_eq!(ids.len(), 100);
        assert!(ids.iter().all(|id| uuid::Uuid::parse_str(id).is_ok()));
    }
}
