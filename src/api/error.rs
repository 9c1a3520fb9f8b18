use std::fmt;

/// Which client call produced an error. Decides the fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    UploadPaper,
    ListPapers,
    DownloadPaper,
    DeletePaper,
    UpdatePaper,
    StructureData,
    ListModerators,
    Users,
    Roles,
    Permissions,
    Profile,
    ProfileImage,
    DegreePrograms,
    AcademicYears,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::UploadPaper => "Failed to upload the file",
            Operation::ListPapers => "Failed to fetch files",
            Operation::DownloadPaper => "Failed to download file",
            Operation::DeletePaper => "Failed to delete the file",
            Operation::UpdatePaper => "Failed to update the file",
            Operation::StructureData => "Error fetching structure data.",
            Operation::ListModerators => "User directory unavailable",
            Operation::Users => "User request failed",
            Operation::Roles => "Role request failed",
            Operation::Permissions => "Failed to fetch permissions",
            Operation::Profile => "Profile request failed",
            Operation::ProfileImage => "Profile image request failed",
            Operation::DegreePrograms => "Failed to fetch degree programs",
            Operation::AcademicYears => "Academic year request failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The request went out but no response came back.
    #[error("no response from server: {0}")]
    Network(#[source] reqwest::Error),
    #[error("server responded with {status}")]
    Server { status: u16, message: Option<String> },
    /// The request could not be built.
    #[error("request setup error: {0}")]
    ClientSetup(String),
    #[error("unexpected data format: {0}")]
    Format(String),
    #[error("No data returned from the server.")]
    EmptyPayload,
    #[error("failed to save downloaded file: {0}")]
    Save(#[source] std::io::Error),
}

/// A failed client call. `Display` renders the single human-readable message
/// shown to users; `kind()` keeps the structured cause.
#[derive(Debug)]
pub struct ApiError {
    operation: Operation,
    kind: ErrorKind,
}

impl ApiError {
    pub fn new(operation: Operation, kind: ErrorKind) -> Self {
        Self { operation, kind }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Server { status, .. } => Some(status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match (&self.kind, self.operation) {
            (ErrorKind::Server { message: Some(m), .. }, _) if !m.trim().is_empty() => m.clone(),
            (ErrorKind::Network(_), Operation::UploadPaper) => "No response from server".to_string(),
            (ErrorKind::ClientSetup(_), Operation::UploadPaper) => "Request setup error".to_string(),
            (ErrorKind::Network(e), Operation::UpdatePaper) => e.to_string(),
            (ErrorKind::ClientSetup(e), Operation::UpdatePaper) => e.clone(),
            (ErrorKind::Format(_), _) => "Unexpected data format.".to_string(),
            (ErrorKind::EmptyPayload, _) => ErrorKind::EmptyPayload.to_string(),
            (ErrorKind::Save(_), _) => self.kind.to_string(),
            (_, op) => op.fallback_message().to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn server(op: Operation, message: Option<&str>) -> ApiError {
        ApiError::new(
            op,
            ErrorKind::Server {
                status: 500,
                message: message.map(str::to_string),
            },
        )
    }

    #[test]
    fn server_message_wins_over_fallback() {
        let err = server(Operation::DeletePaper, Some("Paper not found"));
        assert_eq!(err.to_string(), "Paper not found");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn missing_or_blank_server_message_uses_fallback() {
        assert_eq!(server(Operation::DeletePaper, None).to_string(), "Failed to delete the file");
        assert_eq!(server(Operation::UploadPaper, Some("  ")).to_string(), "Failed to upload the file");
        assert_eq!(server(Operation::ListPapers, None).to_string(), "Failed to fetch files");
    }

    #[test]
    fn upload_setup_error_is_generic() {
        let err = ApiError::new(Operation::UploadPaper, ErrorKind::ClientSetup("bad header".into()));
        assert_eq!(err.to_string(), "Request setup error");
    }

    #[test]
    fn update_setup_error_keeps_its_text() {
        let err = ApiError::new(Operation::UpdatePaper, ErrorKind::ClientSetup("bad mime".into()));
        assert_eq!(err.to_string(), "bad mime");
    }

    #[test]
    fn format_error_hides_parser_detail() {
        let err = ApiError::new(Operation::ListPapers, ErrorKind::Format("expected array".into()));
        assert_eq!(err.to_string(), "Unexpected data format.");
        assert_eq!(err.kind().to_string(), "unexpected data format: expected array");
    }

    #[test]
    fn empty_payload_message() {
        let err = ApiError::new(Operation::DownloadPaper, ErrorKind::EmptyPayload);
        assert_eq!(err.to_string(), "No data returned from the server.");
        assert_eq!(err.status(), None);
    }
}
