use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Extra;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    #[serde(alias = "paperId")]
    pub id: i64,
    #[serde(flatten)]
    pub file: FileMetadata,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub creator: Option<UserRef>,
    #[serde(default)]
    pub moderator: Option<UserRef>,
    #[serde(default)]
    pub academic_year: Option<AcademicYearRef>,
    #[serde(default)]
    pub course_ids: BTreeSet<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A user as embedded in another record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(alias = "userId")]
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearRef {
    #[serde(alias = "academicYearId")]
    pub id: i64,
    #[serde(default)]
    pub year: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_parses_nested_references() {
        let paper: Paper = serde_json::from_value(serde_json::json!({
            "id": 7,
            "fileName": "exam.pdf",
            "remarks": "final",
            "creator": {"userId": 1, "username": "admin"},
            "moderator": {"id": 3, "firstName": "Ada", "lastName": "L"},
            "academicYear": {"id": 2, "year": "2024/2025"},
            "courseIds": [5, 4, 5],
            "filePath": "/srv/papers/exam.pdf"
        }))
        .unwrap();

        assert_eq!(paper.id, 7);
        assert_eq!(paper.file.file_name, "exam.pdf");
        assert_eq!(paper.creator.unwrap().id, 1);
        assert_eq!(paper.moderator.unwrap().first_name.as_deref(), Some("Ada"));
        assert_eq!(paper.course_ids.into_iter().collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(paper.extra["filePath"], "/srv/papers/exam.pdf");
    }

    #[test]
    fn paper_tolerates_sparse_records() {
        let paper: Paper = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(paper.file.file_name.is_empty());
        assert!(paper.course_ids.is_empty());
        assert!(paper.moderator.is_none());
    }
}
