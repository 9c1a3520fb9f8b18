use reqwest::Method;

use super::{ApiClient, ApiResult, Operation};
use crate::models::{AcademicYear, AcademicYearRequest, DegreeProgram};

impl ApiClient {
    pub async fn list_degree_programs(&self) -> ApiResult<Vec<DegreeProgram>> {
        let op = Operation::DegreePrograms;
        let response = self.send(op, self.request(Method::GET, "/degreePrograms")).await?;
        Self::read_payload(op, response).await
    }

    pub async fn list_academic_years(&self) -> ApiResult<Vec<AcademicYear>> {
        let op = Operation::AcademicYears;
        let response = self.send(op, self.request(Method::GET, "/academic-years")).await?;
        Self::read_payload(op, response).await
    }

    pub async fn create_academic_year(&self, year: &AcademicYearRequest) -> ApiResult<Option<String>> {
        let op = Operation::AcademicYears;
        let response = self
            .send(op, self.request(Method::POST, "/academic-years").json(year))
            .await?;
        Self::read_ack(op, response).await
    }

    pub async fn update_academic_year(&self, id: i64, year: &AcademicYearRequest) -> ApiResult<Option<String>> {
        let op = Operation::AcademicYears;
        let response = self
            .send(op, self.request(Method::PUT, &format!("/academic-years/{id}")).json(year))
            .await?;
        Self::read_ack(op, response).await
    }

    pub async fn delete_academic_year(&self, id: i64) -> ApiResult<Option<String>> {
        let op = Operation::AcademicYears;
        let response = self
            .send(op, self.request(Method::DELETE, &format!("/academic-years/{id}")))
            .await?;
        Self::read_ack(op, response).await
    }
}
