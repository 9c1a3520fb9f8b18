use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use super::disposition::filename_from_disposition;
use super::{format_error, ApiClient, ApiError, ApiResult, ErrorKind, Operation};
use crate::models::{Envelope, MessageBody, Paper};
use crate::storage::{FileSink, SavedFile};
use crate::upload::SelectedFile;

/// Everything the backend needs to register a new paper.
#[derive(Debug, Clone)]
pub struct PaperUpload<'a> {
    pub file: &'a SelectedFile,
    pub creator_id: i64,
    pub course_ids: &'a [i64],
    pub remarks: &'a str,
    pub moderator_id: i64,
    pub academic_year_id: i64,
}

pub(super) fn file_part(op: Operation, file: &SelectedFile) -> ApiResult<Part> {
    Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.content_type)
        .map_err(|e| ApiError::new(op, ErrorKind::ClientSetup(e.to_string())))
}

impl ApiClient {
    /// `POST /papers/upload`. Each course id goes out as its own `courseIds`
    /// part. A returned body with a `message` is a soft failure for the caller
    /// to surface.
    pub async fn upload_paper(&self, upload: &PaperUpload<'_>) -> ApiResult<Option<MessageBody>> {
        let op = Operation::UploadPaper;
        let mut form = Form::new()
            .part("file", file_part(op, upload.file)?)
            .text("creatorId", upload.creator_id.to_string())
            .text("moderatorId", upload.moderator_id.to_string())
            .text("remarks", upload.remarks.to_string())
            .text("academicYearId", upload.academic_year_id.to_string());
        for course_id in upload.course_ids {
            form = form.text("courseIds", course_id.to_string());
        }

        let response = self
            .send(op, self.request(Method::POST, "/papers/upload").multipart(form))
            .await?;
        let body = Self::read_message(op, response).await?;
        info!(
            file = %upload.file.name,
            size = upload.file.bytes.len(),
            moderator_id = upload.moderator_id,
            courses = upload.course_ids.len(),
            "Uploaded paper"
        );
        Ok(body)
    }

    /// `GET /papers`. The envelope's `data` must be an array.
    pub async fn list_papers(&self) -> ApiResult<Vec<Paper>> {
        let op = Operation::ListPapers;
        let response = self.send(op, self.request(Method::GET, "/papers")).await?;
        let body: Value = Self::read_json(op, response).await?;
        match body.get("data") {
            Some(data @ Value::Array(_)) => {
                let papers: Vec<Paper> =
                    serde_json::from_value(data.clone()).map_err(|e| format_error(op, e.to_string()))?;
                info!(count = papers.len(), "Fetched papers");
                Ok(papers)
            }
            _ => Err(format_error(op, "expected `data` to be an array of papers")),
        }
    }

    /// `GET /papers/download/{id}?moderatorId=...`, handing the bytes to `sink`
    /// under the name from `Content-Disposition`.
    pub async fn download_paper(&self, id: i64, moderator_id: i64, sink: &dyn FileSink) -> ApiResult<SavedFile> {
        let op = Operation::DownloadPaper;
        let builder = self
            .request(Method::GET, &format!("/papers/download/{id}"))
            .query(&[("moderatorId", moderator_id)]);
        let response = self.send(op, builder).await?;

        let header_text = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let disposition = header_text(CONTENT_DISPOSITION);
        let content_type = header_text(CONTENT_TYPE);

        let bytes = Self::read_bytes(op, response).await?;
        if bytes.is_empty() {
            return Err(ApiError::new(op, ErrorKind::EmptyPayload));
        }

        let file_name = filename_from_disposition(disposition.as_deref());
        let saved = sink
            .save(&file_name, content_type.as_deref(), &bytes)
            .await
            .map_err(|e| ApiError::new(op, ErrorKind::Save(e)))?;
        info!(id, file = %saved.file_name, size = saved.size, "Downloaded paper");
        Ok(saved)
    }

    /// `DELETE /papers/{id}`.
    pub async fn delete_paper(&self, id: i64) -> ApiResult<Option<MessageBody>> {
        let op = Operation::DeletePaper;
        let response = self
            .send(op, self.request(Method::DELETE, &format!("/papers/{id}")))
            .await?;
        let body = Self::read_message(op, response).await?;
        info!(id, "Deleted paper");
        Ok(body)
    }

    /// `PUT /papers/update/{id}` as multipart with `file`, `fileName` and `remarks`.
    pub async fn update_paper(
        &self,
        id: i64,
        file: &SelectedFile,
        file_name: &str,
        remarks: &str,
    ) -> ApiResult<Option<MessageBody>> {
        let op = Operation::UpdatePaper;
        let form = Form::new()
            .part("file", file_part(op, file)?)
            .text("fileName", file_name.to_string())
            .text("remarks", remarks.to_string());
        let response = self
            .send(op, self.request(Method::PUT, &format!("/papers/update/{id}")).multipart(form))
            .await?;
        let body = Self::read_message(op, response).await?;
        info!(id, file_name, "Updated paper");
        Ok(body)
    }

    /// `GET /structure/{file_id}`, returned as the raw JSON document.
    pub async fn structure_data(&self, file_id: i64) -> ApiResult<Value> {
        let op = Operation::StructureData;
        let response = self
            .send(op, self.request(Method::GET, &format!("/structure/{file_id}")))
            .await?;
        Self::read_json(op, response).await
    }

    /// `data` of a paper envelope. Empty or non-JSON bodies and `null` data
    /// give `None`; non-object data (e.g. a plain confirmation string) carries
    /// no message.
    async fn read_message(op: Operation, response: reqwest::Response) -> ApiResult<Option<MessageBody>> {
        let bytes = Self::read_bytes(op, response).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let Ok(envelope) = serde_json::from_slice::<Envelope<Value>>(&bytes) else {
            debug!(operation = ?op, "Accepted with a non-envelope body");
            return Ok(None);
        };
        match envelope.data {
            None | Some(Value::Null) => Ok(None),
            Some(data @ Value::Object(_)) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| format_error(op, e.to_string())),
            Some(_) => Ok(Some(MessageBody::default())),
        }
    }
}
