use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::Method;
use tracing::info;

use super::papers::file_part;
use super::{ApiClient, ApiResult, Operation};
use crate::models::{filter_moderators, Moderator, User, UserProfile, UserWithRoles};
use crate::upload::SelectedFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ApiClient {
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        let op = Operation::Users;
        let response = self.send(op, self.request(Method::GET, "/user")).await?;
        Self::read_payload(op, response).await
    }

    /// Active `PAPER_MODERATOR` holders. Goes out without credentials, on
    /// the configured base URL.
    pub async fn list_moderators(&self) -> ApiResult<Vec<Moderator>> {
        let op = Operation::ListModerators;
        let response = self.send(op, self.public_request(Method::GET, "/user")).await?;
        let users: Vec<User> = Self::read_payload(op, response).await?;
        let total = users.len();
        let moderators = filter_moderators(users);
        info!(total, moderators = moderators.len(), "Fetched moderator candidates");
        Ok(moderators)
    }

    pub async fn get_user(&self, id: i64) -> ApiResult<User> {
        let op = Operation::Users;
        let response = self
            .send(op, self.request(Method::GET, &format!("/user/getUserById/{id}")))
            .await?;
        Self::read_payload(op, response).await
    }

    pub async fn create_user_with_roles(&self, user: &UserWithRoles) -> ApiResult<Option<String>> {
        let op = Operation::Users;
        let response = self
            .send(op, self.request(Method::POST, "/user/addUserWithRoles").json(user))
            .await?;
        Self::read_ack(op, response).await
    }

    pub async fn update_user_with_roles(&self, id: i64, user: &UserWithRoles) -> ApiResult<Option<String>> {
        let op = Operation::Users;
        let response = self
            .send(op, self.request(Method::PUT, &format!("/user/updateUserWithRoles/{id}")).json(user))
            .await?;
        Self::read_ack(op, response).await
    }

    pub async fn delete_user(&self, id: i64) -> ApiResult<Option<String>> {
        let op = Operation::Users;
        let response = self
            .send(op, self.request(Method::DELETE, &format!("/user/deleteUser/{id}")))
            .await?;
        info!(id, "Deleted user");
        Self::read_ack(op, response).await
    }

    /// `PUT /user/users/{id}/status?isActive=...`.
    pub async fn set_user_status(&self, id: i64, active: bool) -> ApiResult<Option<String>> {
        let op = Operation::Users;
        let builder = self
            .request(Method::PUT, &format!("/user/users/{id}/status"))
            .query(&[("isActive", active)]);
        let response = self.send(op, builder).await?;
        info!(id, active, "Updated user status");
        Self::read_ack(op, response).await
    }

    pub async fn user_profile(&self, id: i64) -> ApiResult<UserProfile> {
        let op = Operation::Profile;
        let response = self
            .send(op, self.request(Method::GET, &format!("/user/userProfile/{id}")))
            .await?;
        Self::read_payload(op, response).await
    }

    pub async fn update_user_profile(&self, id: i64, profile: &UserProfile) -> ApiResult<Option<String>> {
        let op = Operation::Profile;
        let response = self
            .send(op, self.request(Method::PUT, &format!("/user/updateUserProfile/{id}")).json(profile))
            .await?;
        Self::read_ack(op, response).await
    }

    pub async fn profile_image(&self, id: i64) -> ApiResult<ProfileImage> {
        let op = Operation::ProfileImage;
        let response = self
            .send(op, self.request(Method::GET, &format!("/user/getProfileImage/{id}")))
            .await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = Self::read_bytes(op, response).await?;
        Ok(ProfileImage { content_type, bytes })
    }

    /// Multipart `PUT` with the image under the `image` field.
    pub async fn update_profile_image(&self, id: i64, image: &SelectedFile) -> ApiResult<Option<String>> {
        let op = Operation::ProfileImage;
        let form = Form::new().part("image", file_part(op, image)?);
        let response = self
            .send(op, self.request(Method::PUT, &format!("/user/updateProfileImage/{id}")).multipart(form))
            .await?;
        Self::read_ack(op, response).await
    }

    pub async fn delete_profile_image(&self, id: i64) -> ApiResult<Option<String>> {
        let op = Operation::ProfileImage;
        let response = self
            .send(op, self.request(Method::DELETE, &format!("/user/deleteProfileImage/{id}")))
            .await?;
        Self::read_ack(op, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::client_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn moderators_are_filtered_from_user_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "username": "admin", "roles": ["ADMIN"], "active": true},
                {"id": 2, "username": "old", "roles": ["PAPER_MODERATOR"], "active": false},
                {"id": 3, "username": "mod", "firstName": "Grace", "lastName": "H", "roles": ["PAPER_MODERATOR"], "active": true}
            ])))
            .mount(&server)
            .await;

        let moderators = client_for(&server, None).list_moderators().await.unwrap();
        assert_eq!(moderators.len(), 1);
        assert_eq!(moderators[0].id, 3);
        assert_eq!(moderators[0].label(), "Grace H (mod)");
    }

    #[tokio::test]
    async fn set_user_status_sends_query_flag() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/user/users/8/status"))
            .and(query_param("isActive", "false"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client_for(&server, None).set_user_status(8, false).await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_user_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/user/addUserWithRoles"))
            .and(body_json(json!({
                "username": "jdoe",
                "email": "jdoe@example.com",
                "firstName": "J",
                "lastName": "Doe",
                "roles": ["PAPER_CREATOR"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("User with roles created successfully"))
            .mount(&server)
            .await;

        let user = UserWithRoles {
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            first_name: "J".into(),
            last_name: "Doe".into(),
            password: None,
            roles: vec!["PAPER_CREATOR".into()],
        };
        let ack = client_for(&server, None).create_user_with_roles(&user).await.unwrap();
        assert_eq!(ack.as_deref(), Some("User with roles created successfully"));
    }

    #[tokio::test]
    async fn get_user_accepts_wrapped_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user/getUserById/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "ok",
                "data": {"userId": 5, "username": "five", "roles": []}
            })))
            .mount(&server)
            .await;

        let user = client_for(&server, None).get_user(5).await.unwrap();
        assert_eq!(user.id, 5);
        assert_eq!(user.username, "five");
    }

    #[tokio::test]
    async fn profile_image_returns_bytes_and_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user/getProfileImage/2"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/user/updateProfileImage/2"))
            .respond_with(ResponseTemplate::new(413).set_body_json(json!({"message": "Image too large"})))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let image = client.profile_image(2).await.unwrap();
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
        assert_eq!(image.bytes.len(), 4);

        let upload = SelectedFile::new("me.png", "image/png", image.bytes);
        let err = client.update_profile_image(2, &upload).await.unwrap_err();
        assert_eq!(err.to_string(), "Image too large");
    }
}
