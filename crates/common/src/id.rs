//! Random identifier generation.
//!
//! Row ids are assigned by the database; this covers the values the
//! application invents itself.

use uuid::Uuid;

/// Generator for stored file names.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a unique stored file name with the given extension.
    ///
    /// `extension` includes the leading dot (e.g. `".jpg"`).
    #[must_use]
    pub fn generate_file_name(&self, extension: &str) -> String {
        format!("{}{extension}", Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_file_name() {
        let id_gen = IdGenerator::new();
        let name = id_gen.generate_file_name(".png");

        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), 32 + 4);
        assert!(!name.contains('-'));
        assert_ne!(name, id_gen.generate_file_name(".png"));
    }
}
