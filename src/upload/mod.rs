mod form;

pub use form::*;

use std::path::Path;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// 10 MiB.
pub const MAX_PAPER_BYTES: u64 = 10 * 1024 * 1024;

/// A file picked for upload: its name, declared content type and bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk; the content type is guessed from its extension.
    /// Files over [`MAX_PAPER_BYTES`] fail with [`ValidationError::TooLarge`]
    /// before any bytes are read.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        if tokio::fs::metadata(path).await?.len() > MAX_PAPER_BYTES {
            return Err(std::io::Error::other(ValidationError::TooLarge));
        }
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("paper.pdf")
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        Ok(Self::new(name, content_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file type. Only PDF files are allowed.")]
    NotPdf,
    #[error("File size exceeds limit. Maximum allowed size is 10 MB.")]
    TooLarge,
    #[error("Please select a file first!")]
    MissingFile,
    #[error("Please select a moderator!")]
    MissingModerator,
    #[error("Course code is required!")]
    MissingCourseCode,
    #[error("Course code must list numeric course ids, e.g. \"12, 14\".")]
    InvalidCourseCode,
    #[error("Remarks are required!")]
    MissingRemarks,
}

/// Checks a picked file before it is stored in a draft.
pub fn validate_selection(file: &SelectedFile) -> Result<(), ValidationError> {
    if file.content_type != PDF_CONTENT_TYPE {
        return Err(ValidationError::NotPdf);
    }
    if file.size() > MAX_PAPER_BYTES {
        return Err(ValidationError::TooLarge);
    }
    Ok(())
}

/// Course ids from free text: numbers separated by commas or whitespace.
pub fn parse_course_ids(code: &str) -> Result<Vec<i64>, ValidationError> {
    let ids = code
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i64>().map_err(|_| ValidationError::InvalidCourseCode))
        .collect::<Result<Vec<_>, _>>()?;
    if ids.is_empty() {
        return Err(ValidationError::MissingCourseCode);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(size: usize) -> SelectedFile {
        SelectedFile::new("exam.pdf", PDF_CONTENT_TYPE, vec![0u8; size])
    }

    #[test]
    fn accepts_pdf_at_limit() {
        assert_eq!(validate_selection(&pdf(MAX_PAPER_BYTES as usize)), Ok(()));
    }

    #[test]
    fn rejects_pdf_over_limit() {
        assert_eq!(
            validate_selection(&pdf(MAX_PAPER_BYTES as usize + 1)),
            Err(ValidationError::TooLarge)
        );
    }

    #[test]
    fn rejects_other_content_types() {
        let doc = SelectedFile::new("exam.docx", "application/msword", vec![1, 2, 3]);
        assert_eq!(validate_selection(&doc), Err(ValidationError::NotPdf));
        let renamed = SelectedFile::new("exam.pdf", "text/plain", vec![1]);
        assert_eq!(validate_selection(&renamed), Err(ValidationError::NotPdf));
    }

    #[test]
    fn oversized_non_pdf_is_rejected() {
        let big = SelectedFile::new("video.mp4", "video/mp4", vec![0u8; MAX_PAPER_BYTES as usize + 1]);
        assert!(validate_selection(&big).is_err());
    }

    #[test]
    fn course_ids_parse_from_mixed_separators() {
        assert_eq!(parse_course_ids("12, 14 15,"), Ok(vec![12, 14, 15]));
        assert_eq!(parse_course_ids(" 7 "), Ok(vec![7]));
    }

    #[test]
    fn course_ids_reject_bad_input() {
        assert_eq!(parse_course_ids("CS101"), Err(ValidationError::InvalidCourseCode));
        assert_eq!(parse_course_ids(" , "), Err(ValidationError::MissingCourseCode));
    }

    #[tokio::test]
    async fn from_path_guesses_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "paper.pdf");
        assert_eq!(file.content_type, PDF_CONTENT_TYPE);
        assert_eq!(file.size(), 8);
    }

    #[tokio::test]
    async fn from_path_refuses_oversized_file_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .set_len(MAX_PAPER_BYTES + 1)
            .unwrap();

        let err = SelectedFile::from_path(&path).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Other);
        assert_eq!(err.to_string(), ValidationError::TooLarge.to_string());
    }

    #[tokio::test]
    async fn from_path_unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.unknownext");
        std::fs::write(&path, b"x").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.content_type, "application/octet-stream");
        assert_eq!(validate_selection(&file), Err(ValidationError::NotPdf));
    }
}
