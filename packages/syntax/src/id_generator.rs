use crc32fast::Hasher;

/// Derive a stable document ID from a file path using CRC32.
pub fn document_id(path: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(path.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential element-ID generator for one tree version.
///
/// IDs look like `"{document}.{generation}-{n}"`. The generation part is
/// what separates tree versions: rebuilding a tree after a batch of
/// substitutions bumps the generation, so no identity from the old
/// version can collide with (or be mistaken for) one from the new.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(path: &str, generation: u32) -> Self {
        Self::from_seed(format!("{}.{}", document_id(path), generation))
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next sequential ID.
    pub fn next_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_is_stable() {
        assert_eq!(document_id("/a.cs"), document_id("/a.cs"));
        assert_ne!(document_id("/a.cs"), document_id("/b.cs"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = IdGenerator::new("/test.cs", 0);

        let id1 = ids.next_id();
        let id2 = ids.next_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id1.starts_with(ids.seed()));
    }

    #[test]
    fn test_generations_do_not_collide() {
        let mut gen0 = IdGenerator::new("/test.cs", 0);
        let mut gen1 = IdGenerator::new("/test.cs", 1);

        assert_ne!(gen0.next_id(), gen1.next_id());
    }
}
