//! Upload form controller.
//!
//! Owns one [`UploadDraft`], validates it locally and submits it through a
//! [`PaperUploader`]. Outcomes are reported as a single [`Banner`]. The form
//! moves `Idle -> Validating -> Submitting -> {Success, Failed}` and goes back
//! to `Idle` when the banner is cleared.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{parse_course_ids, validate_selection, SelectedFile, ValidationError};
use crate::api::{ApiClient, ApiResult, PaperUpload};
use crate::models::{MessageBody, Moderator};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully.";

#[async_trait]
pub trait PaperUploader: Send + Sync {
    async fn upload(&self, upload: &PaperUpload<'_>) -> ApiResult<Option<MessageBody>>;
}

#[async_trait]
pub trait ModeratorDirectory: Send + Sync {
    async fn moderators(&self) -> ApiResult<Vec<Moderator>>;
}

#[async_trait]
impl PaperUploader for ApiClient {
    async fn upload(&self, upload: &PaperUpload<'_>) -> ApiResult<Option<MessageBody>> {
        self.upload_paper(upload).await
    }
}

#[async_trait]
impl ModeratorDirectory for ApiClient {
    async fn moderators(&self) -> ApiResult<Vec<Moderator>> {
        self.list_moderators().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

/// Unsubmitted form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub file: Option<SelectedFile>,
    pub course_code: String,
    pub remarks: String,
    pub moderator_id: Option<i64>,
}

impl UploadDraft {
    /// Checks every submission precondition, in the order the form reports
    /// them, and returns the file, moderator and parsed course ids.
    pub fn validate(&self) -> Result<(&SelectedFile, i64, Vec<i64>), ValidationError> {
        let file = self.file.as_ref().ok_or(ValidationError::MissingFile)?;
        let moderator_id = self.moderator_id.ok_or(ValidationError::MissingModerator)?;
        if self.course_code.trim().is_empty() {
            return Err(ValidationError::MissingCourseCode);
        }
        if self.remarks.trim().is_empty() {
            return Err(ValidationError::MissingRemarks);
        }
        let course_ids = parse_course_ids(&self.course_code)?;
        Ok((file, moderator_id, course_ids))
    }
}

#[derive(Debug)]
pub struct UploadForm {
    creator_id: i64,
    academic_year_id: i64,
    draft: UploadDraft,
    moderators: Vec<Moderator>,
    state: FormState,
    banner: Option<Banner>,
}

impl UploadForm {
    pub fn new(creator_id: i64, academic_year_id: i64) -> Self {
        Self {
            creator_id,
            academic_year_id,
            draft: UploadDraft::default(),
            moderators: Vec::new(),
            state: FormState::Idle,
            banner: None,
        }
    }

    pub fn draft(&self) -> &UploadDraft {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn moderators(&self) -> &[Moderator] {
        &self.moderators
    }

    pub fn is_uploading(&self) -> bool {
        self.state == FormState::Submitting
    }

    /// Fetches moderator candidates and pre-selects the first one. A failed
    /// fetch sets the error banner and is handed back to the caller.
    pub async fn load_moderators(&mut self, directory: &dyn ModeratorDirectory) -> ApiResult<()> {
        match directory.moderators().await {
            Ok(moderators) => {
                if let Some(first) = moderators.first() {
                    self.draft.moderator_id = Some(first.id);
                }
                debug!(count = moderators.len(), selected = ?self.draft.moderator_id, "Loaded moderators");
                self.moderators = moderators;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Could not load moderators");
                self.banner = Some(Banner::Error(format!("Failed to fetch moderators: {e}")));
                Err(e)
            }
        }
    }

    /// Stores `file` if it is a PDF within the size limit. On rejection the
    /// previously stored file stays and the error banner is set.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), ValidationError> {
        self.state = FormState::Validating;
        let checked = validate_selection(&file);
        self.state = FormState::Idle;
        match checked {
            Ok(()) => {
                debug!(file = %file.name, size = file.bytes.len(), "Selected file");
                self.draft.file = Some(file);
                if matches!(self.banner, Some(Banner::Error(_))) {
                    self.banner = None;
                }
                Ok(())
            }
            Err(e) => {
                self.banner = Some(Banner::Error(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn set_course_code(&mut self, course_code: impl Into<String>) {
        self.draft.course_code = course_code.into();
    }

    pub fn set_remarks(&mut self, remarks: impl Into<String>) {
        self.draft.remarks = remarks.into();
    }

    pub fn select_moderator(&mut self, moderator_id: i64) {
        self.draft.moderator_id = Some(moderator_id);
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
        if matches!(self.state, FormState::Success | FormState::Failed) {
            self.state = FormState::Idle;
        }
    }

    /// Validates the draft and, only if it passes, uploads it. Returns the
    /// state the form ends in: `Idle` after a validation failure, otherwise
    /// `Success` or `Failed`. The draft is kept on every failure path.
    pub async fn submit(&mut self, uploader: &dyn PaperUploader) -> FormState {
        self.state = FormState::Validating;
        let (file, moderator_id, course_ids) = match self.draft.validate() {
            Ok(valid) => valid,
            Err(e) => {
                debug!(error = %e, "Upload draft rejected");
                self.banner = Some(Banner::Error(e.to_string()));
                self.state = FormState::Idle;
                return self.state;
            }
        };

        self.state = FormState::Submitting;
        self.banner = None;
        let remarks = self.draft.remarks.trim().to_string();
        let upload = PaperUpload {
            file,
            creator_id: self.creator_id,
            course_ids: &course_ids,
            remarks: &remarks,
            moderator_id,
            academic_year_id: self.academic_year_id,
        };
        let outcome = uploader.upload(&upload).await;

        let (state, banner) = match outcome {
            Ok(body) => match body.as_ref().and_then(MessageBody::soft_failure) {
                Some(message) => {
                    warn!(message, "Upload reported a failure");
                    (FormState::Failed, Banner::Error(message.to_string()))
                }
                None => (FormState::Success, Banner::Success(UPLOAD_SUCCESS_MESSAGE.to_string())),
            },
            Err(e) => (
                FormState::Failed,
                Banner::Error(format!("Failed to upload the file: {e}")),
            ),
        };

        if state == FormState::Success {
            info!(moderator_id, courses = ?course_ids, "Paper submitted");
            self.draft.file = None;
            self.draft.course_code.clear();
            self.draft.remarks.clear();
        }
        self.state = state;
        self.banner = Some(banner);
        state
    }
}
