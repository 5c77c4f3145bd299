//! Users and their profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, InsertPayload};
use crate::schema::tables;

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    /// Unique across all users
    pub email: String,
    /// Opaque credential; this layer neither hashes nor inspects it
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub university: String,
    pub program: String,
    pub year: String,
    pub profile_complete: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub university: String,
    pub program: String,
    pub year: String,
}

impl Entity for User {
    const TABLE: &'static str = tables::USERS;
    type Insert = InsertUser;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertUser {
        InsertUser {
            email: self.email.clone(),
            password: self.password.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            university: self.university.clone(),
            program: self.program.clone(),
            year: self.year.clone(),
        }
    }
}

impl InsertPayload for InsertUser {
    type Row = User;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            university: self.university,
            program: self.program,
            year: self.year,
            profile_complete: false,
            created_at: now,
        }
    }
}

/// One profile per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub bio: Option<String>,
    pub study_style: Option<String>,
    pub study_spot: Option<String>,
    pub photos: Vec<String>,
    pub classes: Vec<String>,
    pub activities: Vec<String>,
    pub interests: Vec<String>,
    pub study_habits: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertProfile {
    pub user_id: i32,
    pub bio: Option<String>,
    pub study_style: Option<String>,
    pub study_spot: Option<String>,
    pub photos: Option<Vec<String>>,
    pub classes: Option<Vec<String>>,
    pub activities: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub study_habits: Option<Vec<String>>,
}

impl InsertProfile {
    /// A profile with only the owning user set
    pub fn for_user(user_id: i32) -> Self {
        Self {
            user_id,
            bio: None,
            study_style: None,
            study_spot: None,
            photos: None,
            classes: None,
            activities: None,
            interests: None,
            study_habits: None,
        }
    }
}

impl Entity for Profile {
    const TABLE: &'static str = tables::PROFILES;
    type Insert = InsertProfile;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertProfile {
        InsertProfile {
            user_id: self.user_id,
            bio: self.bio.clone(),
            study_style: self.study_style.clone(),
            study_spot: self.study_spot.clone(),
            photos: Some(self.photos.clone()),
            classes: Some(self.classes.clone()),
            activities: Some(self.activities.clone()),
            interests: Some(self.interests.clone()),
            study_habits: Some(self.study_habits.clone()),
        }
    }
}

impl InsertPayload for InsertProfile {
    type Row = Profile;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> Profile {
        Profile {
            id,
            user_id: self.user_id,
            bio: self.bio,
            study_style: self.study_style,
            study_spot: self.study_spot,
            photos: self.photos.unwrap_or_default(),
            classes: self.classes.unwrap_or_default(),
            activities: self.activities.unwrap_or_default(),
            interests: self.interests.unwrap_or_default(),
            study_habits: self.study_habits.unwrap_or_default(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Catalog, Reason, ServerFieldPolicy, ValidationOptions};
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_user_from_json_and_materialize() {
        let catalog = Catalog::standard().unwrap();
        let payload = json!({
            "email": "a@b.edu",
            "password": "x",
            "firstName": "A",
            "lastName": "B",
            "university": "U",
            "program": "CS",
            "year": "2025"
        });

        let insert = InsertUser::from_json(&catalog, &payload).unwrap();
        let user = insert.into_row(1, now());

        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "A");
        assert!(!user.profile_complete);
        assert_eq!(user.created_at, now());
    }

    #[test]
    fn test_user_caller_cannot_set_profile_complete() {
        let catalog = Catalog::standard().unwrap();
        let payload = json!({
            "email": "a@b.edu",
            "password": "x",
            "firstName": "A",
            "lastName": "B",
            "university": "U",
            "program": "CS",
            "year": "2025",
            "profileComplete": true
        });

        let err = InsertUser::from_json(&catalog, &payload).unwrap_err();
        assert_eq!(err.detail_for("profileComplete").unwrap().reason, Reason::ServerAssigned);

        let options = ValidationOptions {
            server_fields: ServerFieldPolicy::Strip,
            ..Default::default()
        };
        let user = InsertUser::from_json_with(&catalog, &payload, options)
            .unwrap()
            .into_row(7, now());
        assert!(!user.profile_complete);
    }

    #[test]
    fn test_profile_lists_default_to_empty() {
        let catalog = Catalog::standard().unwrap();
        let payload = json!({ "userId": 3, "bio": "night owl", "interests": ["chess"], "photos": null });

        let profile = InsertProfile::from_json(&catalog, &payload)
            .unwrap()
            .into_row(1, now());

        assert_eq!(profile.bio.as_deref(), Some("night owl"));
        assert_eq!(profile.interests, vec!["chess"]);
        assert!(profile.photos.is_empty());
        assert!(profile.study_habits.is_empty());
        assert_eq!(profile.updated_at, now());
    }

    #[test]
    fn test_row_serializes_camel_case() {
        let user = InsertUser {
            email: "a@b.edu".into(),
            password: "x".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            university: "U".into(),
            program: "CS".into(),
            year: "2025".into(),
        }
        .into_row(1, now());

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["firstName"], "A");
        assert_eq!(value["profileComplete"], false);
        assert!(value.get("first_name").is_none());
    }
}
