//! BLAKE3 content hashing.

use crate::chunk::ContentHash;

/// Incremental BLAKE3 hasher fed one chunk at a time.
#[derive(Debug, Clone, Default)]
pub(crate) struct Blake3Hasher {
    state: blake3::Hasher,
}

impl Blake3Hasher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    pub(crate) fn finalize(&self) -> ContentHash {
        ContentHash::new(self.state.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = Blake3Hasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");

        let expected = ContentHash::new(blake3::hash(b"hello world").into());
        assert_eq!(hasher.finalize(), expected);
    }

    #[test]
    fn test_different_input_differs() {
        let mut a = Blake3Hasher::new();
        a.update(b"abc");
        let mut b = Blake3Hasher::new();
        b.update(b"abd");
        assert_ne!(a.finalize(), b.finalize());
    }
}
