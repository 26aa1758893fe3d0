//! File names for synthesized chunks.

use std::path::Path;

/// Synthesized audio is always LINEAR16 in a WAV container.
pub const AUDIO_EXTENSION: &str = ".wav";

const DEFAULT_BASE_NAME: &str = "output";

/// Base name and extension used to derive per-chunk file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingParams {
    pub base_name: String,
    pub extension: String,
}

impl Default for NamingParams {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_string(),
            extension: AUDIO_EXTENSION.to_string(),
        }
    }
}

impl NamingParams {
    /// Derive naming from the source file name: "book.txt" -> base "book", ".wav".
    pub fn from_file_name(name: &str) -> Self {
        // Browsers on Windows may send a full client-side path
        let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let base_name = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string());

        Self {
            base_name,
            ..Self::default()
        }
    }

    /// File name for the 1-based chunk `index`: "{base}_Part{index:03}{ext}".
    pub fn file_name(&self, index: usize) -> String {
        format!("{}_Part{:03}{}", self.base_name, index, self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_name() {
        let naming = NamingParams::from_file_name("chapter one.txt");
        assert_eq!(naming.base_name, "chapter one");
        assert_eq!(naming.extension, ".wav");
    }

    #[test]
    fn test_from_file_name_without_extension() {
        assert_eq!(NamingParams::from_file_name("notes").base_name, "notes");
    }

    #[test]
    fn test_from_file_name_with_client_path() {
        assert_eq!(
            NamingParams::from_file_name("C:\\Users\\me\\story.txt").base_name,
            "story"
        );
        assert_eq!(NamingParams::from_file_name("/tmp/a/b.txt").base_name, "b");
    }

    #[test]
    fn test_from_empty_file_name() {
        assert_eq!(NamingParams::from_file_name("").base_name, "output");
    }

    #[test]
    fn test_sequential_file_names() {
        let naming = NamingParams::from_file_name("book.txt");
        let names: Vec<String> = (1..=3).map(|i| naming.file_name(i)).collect();
        assert_eq!(
            names,
            vec!["book_Part001.wav", "book_Part002.wav", "book_Part003.wav"]
        );
    }

    #[test]
    fn test_file_name_past_three_digits() {
        let naming = NamingParams::default();
        assert_eq!(naming.file_name(1234), "output_Part1234.wav");
    }
}
