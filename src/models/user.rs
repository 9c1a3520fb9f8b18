use serde::{Deserialize, Serialize};

use super::Extra;

pub const PAPER_MODERATOR_ROLE: &str = "PAPER_MODERATOR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "userId")]
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, alias = "isActive")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_moderator(&self) -> bool {
        self.active && self.has_role(PAPER_MODERATOR_ROLE)
    }
}

/// Active user holding the paper moderator role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Moderator {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl Moderator {
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.first_name, self.last_name, self.username)
    }
}

/// Keeps active `PAPER_MODERATOR` users, preserving server order.
pub fn filter_moderators(users: impl IntoIterator<Item = User>) -> Vec<Moderator> {
    users
        .into_iter()
        .filter(User::is_moderator)
        .map(|u| Moderator {
            id: u.id,
            username: u.username,
            first_name: u.first_name.unwrap_or_default(),
            last_name: u.last_name.unwrap_or_default(),
        })
        .collect()
}

/// Body for creating or updating a user together with role names.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithRoles {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(alias = "roleId", default)]
    pub id: Option<i64>,
    #[serde(alias = "name")]
    pub role_name: String,
    #[serde(default, alias = "description")]
    pub role_description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for creating or updating a role.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    pub role_name: String,
    pub role_description: String,
    pub permission_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(alias = "permissionId", default)]
    pub id: Option<i64>,
    #[serde(alias = "permissionName")]
    pub name: String,
    #[serde(default, alias = "permissionDescription")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, roles: &[&str], active: bool) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: None,
            first_name: Some("First".into()),
            last_name: Some("Last".into()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            active,
            extra: Extra::new(),
        }
    }

    #[test]
    fn filter_keeps_only_active_moderators() {
        let users = vec![
            user(1, &["ADMIN"], true),
            user(2, &[PAPER_MODERATOR_ROLE], false),
            user(3, &["PAPER_CREATOR", PAPER_MODERATOR_ROLE], true),
        ];
        let moderators = filter_moderators(users);
        assert_eq!(moderators.len(), 1);
        assert_eq!(moderators[0].id, 3);
        assert_eq!(moderators[0].label(), "First Last (user3)");
    }

    #[test]
    fn user_accepts_backend_field_names() {
        let u: User = serde_json::from_value(serde_json::json!({
            "userId": 9,
            "username": "mod",
            "firstName": "M",
            "roles": ["PAPER_MODERATOR"],
            "isActive": true
        }))
        .unwrap();
        assert_eq!(u.id, 9);
        assert!(u.is_moderator());
    }

    #[test]
    fn user_without_active_flag_is_not_moderator() {
        let u: User = serde_json::from_str(r#"{"id": 1, "username": "x", "roles": ["PAPER_MODERATOR"]}"#).unwrap();
        assert!(!u.is_moderator());
    }

    #[test]
    fn password_is_omitted_when_absent() {
        let body = serde_json::to_value(UserWithRoles {
            username: "u".into(),
            roles: vec!["ADMIN".into()],
            ..Default::default()
        })
        .unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["firstName"], "");
    }
}
