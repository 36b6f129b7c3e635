// ==========================================
// Exam Center - Identifier generation
// ==========================================

use uuid::Uuid;

pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic `<prefix>-<n>` ids, starting at 1
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIdGenerator::new("SHA");
        assert_eq!(ids.next_id(), "SHA-1");
        assert_eq!(ids.next_id(), "SHA-2");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let mut ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
