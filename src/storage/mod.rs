use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Result of handing downloaded bytes to a [`FileSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub location: Option<PathBuf>,
    pub size: usize,
}

/// Platform "save bytes as file" capability used by downloads.
#[async_trait]
pub trait FileSink: Send + Sync {
    async fn save(&self, file_name: &str, content_type: Option<&str>, bytes: &[u8]) -> std::io::Result<SavedFile>;
}

/// Writes downloads into a folder, creating it on first use. A name that is
/// already taken gets a ` (1)`, ` (2)`, ... suffix before its extension.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    folder: PathBuf,
}

impl DirectorySink {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self { folder: folder.into() }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn save(&self, file_name: &str, _content_type: Option<&str>, bytes: &[u8]) -> std::io::Result<SavedFile> {
        ensure_dir(&self.folder).await?;
        let mut copy = 0;
        let (name, path, mut file) = loop {
            let name = numbered_name(file_name, copy);
            let path = self.folder.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => break (name, path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => copy += 1,
                Err(e) => return Err(e),
            }
        };
        file.write_all(bytes).await?;
        file.flush().await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Saved download");
        Ok(SavedFile {
            file_name: name,
            location: Some(path),
            size: bytes.len(),
        })
    }
}

/// `report.pdf` becomes `report (2).pdf` for `copy == 2`.
fn numbered_name(file_name: &str, copy: u32) -> String {
    if copy == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({copy}).{ext}"),
        _ => format!("{file_name} ({copy})"),
    }
}

pub async fn ensure_dir(folder: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(folder).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn directory_sink_creates_folder_and_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("nested/downloads"));

        let saved = sink.save("paper.pdf", Some("application/pdf"), b"%PDF-1.4").await.unwrap();

        assert_eq!(saved.size, 8);
        let path = saved.location.unwrap();
        assert_eq!(path, sink.folder().join("paper.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn repeated_names_get_numbered_copies() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());

        let first = sink.save("report.pdf", None, b"one").await.unwrap();
        let second = sink.save("report.pdf", None, b"two").await.unwrap();
        let third = sink.save("report.pdf", None, b"three").await.unwrap();

        assert_eq!(first.file_name, "report.pdf");
        assert_eq!(second.file_name, "report (1).pdf");
        assert_eq!(third.file_name, "report (2).pdf");
        assert_eq!(std::fs::read(tmp.path().join("report.pdf")).unwrap(), b"one");
        assert_eq!(std::fs::read(tmp.path().join("report (1).pdf")).unwrap(), b"two");
    }

    #[test]
    fn numbered_name_handles_missing_extension() {
        assert_eq!(numbered_name("README", 1), "README (1)");
        assert_eq!(numbered_name(".hidden", 2), ".hidden (2)");
        assert_eq!(numbered_name("a.tar.gz", 1), "a.tar (1).gz");
    }
}
