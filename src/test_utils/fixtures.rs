use std::path::PathBuf;

use tempfile::TempDir;

/// Test fixture providing isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Write a CV document as `cv.yaml`.
    #[must_use]
    pub fn create_cv(&self, content: &str) -> PathBuf {
        self.create_file("cv.yaml", content)
    }

    /// Write a vibes document as `vibes.yaml`.
    #[must_use]
    pub fn create_vibes(&self, content: &str) -> PathBuf {
        self.create_file("vibes.yaml", content)
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}

/// A small CV exercising nested lists, explicit slugs and colliding labels.
pub const SAMPLE_CV: &str = "\
basics:
  name: Ada Lovelace
  email: ada@example.com
work:
  - name: Acme Co
    position: Engineer
  - name: Initech
    position: Engineer
  - name: Globex
    slug: globex
education:
  - institution: MIT
    courses:
      - name: CS101
      - name: MA201
skills:
  - name: Rust
    keywords: [serde, tokio]
";

/// Vibes matching [`SAMPLE_CV`].
pub const SAMPLE_VIBES: &str = "\
- name: Full
  output: [html]
- name: Short
  output: [html, docx]
  theme-options:
    title: Short CV
  filter:
    basics: {name: true}
    work: [acme-co, initech, hooli]
    education: {institution: true, courses: [cs101]}
";
