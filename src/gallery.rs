//! Local gallery store.
//!
//! A JSON file holding the array of previously generated images, read on
//! view, appended on generation, cleared on request. The record shape is
//! `{id, url, prompt, createdAt}`.

use crate::error::Result;
use crate::image::GeneratedImage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One stored gallery record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Record id.
    pub id: Uuid,
    /// Remote URL or data URI of the image.
    pub url: String,
    /// Prompt the image was generated from.
    pub prompt: String,
    /// When the record was stored.
    pub created_at: DateTime<Utc>,
}

impl StoredImage {
    /// Creates a record for a freshly generated image.
    pub fn new(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            prompt: prompt.into(),
            created_at: Utc::now(),
        }
    }
}

/// File-backed gallery store.
pub struct GalleryStore {
    path: PathBuf,
}

impl GalleryStore {
    /// Creates a store backed by the given file path. The file is created
    /// lazily on first append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Reads all stored records. A missing file reads as an empty gallery.
    pub fn list(&self) -> Result<Vec<StoredImage>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Appends one record.
    pub fn append(&self, record: StoredImage) -> Result<()> {
        let mut records = self.list()?;
        records.push(record);
        self.write(&records)
    }

    /// Appends a record for every image in a generation batch, all sharing
    /// the prompt that produced them. Returns the stored records.
    pub fn append_generated(
        &self,
        images: &[GeneratedImage],
        prompt: &str,
    ) -> Result<Vec<StoredImage>> {
        let mut records = self.list()?;
        let new: Vec<StoredImage> = images
            .iter()
            .map(|image| StoredImage::new(&image.url, prompt))
            .collect();
        records.extend(new.iter().cloned());
        self.write(&records)?;
        Ok(new)
    }

    /// Clears the gallery; a subsequent list reads empty.
    pub fn clear(&self) -> Result<()> {
        self.write(&[])
    }

    fn write(&self, records: &[StoredImage]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, GalleryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = GalleryStore::new(dir.path().join("gallery.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_append_round_trip() {
        let (_dir, store) = temp_store();
        let record = StoredImage::new("data:image/png;base64,AAA", "a red fox");
        store.append(record.clone()).unwrap();

        let read = store.list().unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0], record);
    }

    #[test]
    fn test_append_preserves_existing_records() {
        let (_dir, store) = temp_store();
        store
            .append(StoredImage::new("https://example.com/1.png", "first"))
            .unwrap();
        store
            .append(StoredImage::new("https://example.com/2.png", "second"))
            .unwrap();

        let read = store.list().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].prompt, "first");
        assert_eq!(read[1].prompt, "second");
    }

    #[test]
    fn test_append_generated_batch() {
        let (_dir, store) = temp_store();
        let images = vec![
            GeneratedImage::from_url("https://example.com/a.png"),
            GeneratedImage::from_base64("image/png", "BBB"),
        ];
        let stored = store.append_generated(&images, "two cats").unwrap();

        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].url, "https://example.com/a.png");
        assert_eq!(stored[1].url, "data:image/png;base64,BBB");
        assert!(stored.iter().all(|r| r.prompt == "two cats"));

        let read = store.list().unwrap();
        assert_eq!(read, stored);
    }

    #[test]
    fn test_clear_empties_store() {
        let (_dir, store) = temp_store();
        store
            .append(StoredImage::new("https://example.com/1.png", "x"))
            .unwrap();
        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = StoredImage::new("u", "p");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
