use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYear {
    #[serde(alias = "academicYearId", default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for creating or updating an academic year.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearRequest {
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeProgram {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "degreeName")]
    pub name: Option<String>,
    #[serde(default, alias = "degreeDescription")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
