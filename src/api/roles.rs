use reqwest::Method;

use super::{ApiClient, ApiResult, Operation};
use crate::models::{Permission, Role, RoleRequest};

impl ApiClient {
    pub async fn list_roles(&self) -> ApiResult<Vec<Role>> {
        let op = Operation::Roles;
        let response = self.send(op, self.request(Method::GET, "/roles/all")).await?;
        Self::read_payload(op, response).await
    }

    pub async fn get_role(&self, id: i64) -> ApiResult<Role> {
        let op = Operation::Roles;
        let response = self
            .send(op, self.request(Method::GET, &format!("/roles/view/{id}")))
            .await?;
        Self::read_payload(op, response).await
    }

    pub async fn create_role(&self, role: &RoleRequest) -> ApiResult<Option<String>> {
        let op = Operation::Roles;
        let response = self
            .send(op, self.request(Method::POST, "/roles/create").json(role))
            .await?;
        Self::read_ack(op, response).await
    }

    pub async fn update_role(&self, id: i64, role: &RoleRequest) -> ApiResult<Option<String>> {
        let op = Operation::Roles;
        let response = self
            .send(op, self.request(Method::PUT, &format!("/roles/update/{id}")).json(role))
            .await?;
        Self::read_ack(op, response).await
    }

    pub async fn delete_role(&self, id: i64) -> ApiResult<Option<String>> {
        let op = Operation::Roles;
        let response = self
            .send(op, self.request(Method::DELETE, &format!("/roles/delete/{id}")))
            .await?;
        Self::read_ack(op, response).await
    }

    pub async fn list_permissions(&self) -> ApiResult<Vec<Permission>> {
        let op = Operation::Permissions;
        let response = self.send(op, self.request(Method::GET, "/permissions")).await?;
        Self::read_payload(op, response).await
    }
}
