//! [`TextFixture`] for tag-editing test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A text file inside its own temporary directory.
///
/// # Example
///
/// ```rust,no_run
/// use tagline_test_utils::TextFixture;
///
/// let fixture = TextFixture::with_lines("notes.txt", &["A", "B", "C"]);
/// assert_eq!(fixture.read_lines(), vec!["A", "B", "C"]);
/// ```
pub struct TextFixture {
    temp_dir: TempDir,
    path: PathBuf,
}

impl TextFixture {
    /// Write `text` verbatim to `name`.
    pub fn with_text(name: &str, text: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(name);
        fs::write(&path, text)
            .unwrap_or_else(|e| panic!("TextFixture: failed to write {}: {}", path.display(), e));
        Self { temp_dir, path }
    }

    /// Write each of `lines` followed by a newline to `name`.
    pub fn with_lines(name: &str, lines: &[&str]) -> Self {
        let mut text = String::new();
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        Self::with_text(name, &text)
    }

    /// Path of the fixture file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root of the temporary directory holding the file.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Raw file content.
    pub fn read(&self) -> String {
        fs::read_to_string(&self.path)
            .unwrap_or_else(|e| panic!("TextFixture: failed to read {}: {}", self.path.display(), e))
    }

    /// File content split into lines, terminators stripped.
    pub fn read_lines(&self) -> Vec<String> {
        self.read().lines().map(str::to_string).collect()
    }

    /// Names of leftover `.tmp` files in the fixture directory.
    pub fn stray_scratch_files(&self) -> Vec<String> {
        fs::read_dir(self.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }
}
