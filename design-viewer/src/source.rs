//! Directory-backed document source.
//!
//! Layout:
//!
//! ```text
//! <dir>/<id>.json     one DocumentRecord per file
//! <dir>/shares.json   {"<token>": "<id>", ...}
//! ```

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use design_core::{DesignError, DesignResult, DocumentRecord, DocumentSource};

const SHARES_FILE: &str = "shares.json";

/// Reads document records from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    /// Create a source over `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &str) -> Option<PathBuf> {
        let plain = !id.is_empty()
            && id != SHARES_FILE.trim_end_matches(".json")
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        plain.then(|| self.dir.join(format!("{id}.json")))
    }

    async fn read(path: &Path, missing: DesignError) -> DesignResult<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(missing),
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock
                ) =>
            {
                Err(DesignError::Transient(format!("{}: {e}", path.display())))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch_by_id(&self, id: &str) -> DesignResult<DocumentRecord> {
        let path = self
            .record_path(id)
            .ok_or_else(|| DesignError::NotFound(id.to_string()))?;
        tracing::debug!("Reading {}", path.display());
        let text = Self::read(&path, DesignError::NotFound(id.to_string())).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch_by_share_token(&self, token: &str) -> DesignResult<DocumentRecord> {
        let shares_path = self.dir.join(SHARES_FILE);
        let text = Self::read(&shares_path, DesignError::NotShared(token.to_string())).await?;
        let shares: HashMap<String, String> = serde_json::from_str(&text)?;
        let id = shares
            .get(token)
            .ok_or_else(|| DesignError::NotShared(token.to_string()))?;
        self.fetch_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_core::{Canvas, Document};

    fn write_record(dir: &Path, id: &str) {
        let record = DocumentRecord {
            id: id.to_string(),
            title: "Onboarding".to_string(),
            doc: Document::new(Canvas::new(375.0, 667.0)),
            thumbnail: None,
            owner: Some("designer".to_string()),
        };
        let json = serde_json::to_string(&record).expect("encode");
        std::fs::write(dir.join(format!("{id}.json")), json).expect("write");
    }

    #[tokio::test]
    async fn test_reads_record_by_id_and_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_record(dir.path(), "welcome");
        std::fs::write(dir.path().join(SHARES_FILE), r#"{"abc123": "welcome"}"#).expect("write");

        let source = FileSource::new(dir.path());
        let by_id = source.fetch_by_id("welcome").await.expect("by id");
        assert_eq!(by_id.title, "Onboarding");
        let by_token = source.fetch_by_share_token("abc123").await.expect("by token");
        assert_eq!(by_token, by_id);
    }

    #[tokio::test]
    async fn test_missing_documents_and_tokens() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = FileSource::new(dir.path());

        assert!(matches!(
            source.fetch_by_id("nope").await,
            Err(DesignError::NotFound(_))
        ));
        assert!(matches!(
            source.fetch_by_share_token("abc").await,
            Err(DesignError::NotShared(_))
        ));
        assert!(matches!(
            source.fetch_by_id("../etc/passwd").await,
            Err(DesignError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_a_serialization_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.json"), "{not json").expect("write");
        let err = FileSource::new(dir.path())
            .fetch_by_id("broken")
            .await
            .expect_err("corrupt");
        assert!(matches!(err, DesignError::Serialization(_)));
        assert!(!err.is_retryable());
    }
}
