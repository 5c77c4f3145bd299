//! Clubs and club memberships

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, InsertPayload};
use crate::schema::tables::{self, DEFAULT_MEMBER_ROLE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub university: String,
    /// Maintained by the data-access layer alongside membership inserts
    pub member_count: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertClub {
    pub name: String,
    pub description: String,
    pub category: String,
    pub university: String,
    pub image: Option<String>,
}

impl Entity for Club {
    const TABLE: &'static str = tables::CLUBS;
    type Insert = InsertClub;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertClub {
        InsertClub {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            university: self.university.clone(),
            image: self.image.clone(),
        }
    }
}

impl InsertPayload for InsertClub {
    type Row = Club;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> Club {
        Club {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            university: self.university,
            member_count: 0,
            image: self.image,
            created_at: now,
        }
    }
}

/// Join row between a user and a club
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubMembership {
    pub id: i32,
    pub user_id: i32,
    pub club_id: i32,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertClubMembership {
    pub user_id: i32,
    pub club_id: i32,
    pub role: Option<String>,
}

impl Entity for ClubMembership {
    const TABLE: &'static str = tables::CLUB_MEMBERSHIPS;
    type Insert = InsertClubMembership;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertClubMembership {
        InsertClubMembership {
            user_id: self.user_id,
            club_id: self.club_id,
            role: Some(self.role.clone()),
        }
    }
}

impl InsertPayload for InsertClubMembership {
    type Row = ClubMembership;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> ClubMembership {
        ClubMembership {
            id,
            user_id: self.user_id,
            club_id: self.club_id,
            role: self.role.unwrap_or_else(|| DEFAULT_MEMBER_ROLE.to_string()),
            joined_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Catalog, Reason};
    use serde_json::json;

    #[test]
    fn test_club_starts_with_zero_members() {
        let catalog = Catalog::standard().unwrap();
        let payload = json!({
            "name": "Robotics",
            "description": "Build things",
            "category": "engineering",
            "university": "U"
        });

        let club = InsertClub::from_json(&catalog, &payload)
            .unwrap()
            .into_row(4, Utc::now());
        assert_eq!(club.member_count, 0);
        assert!(club.image.is_none());
    }

    #[test]
    fn test_club_member_count_not_accepted() {
        let catalog = Catalog::standard().unwrap();
        let payload = json!({
            "name": "Robotics",
            "description": "Build things",
            "category": "engineering",
            "university": "U",
            "memberCount": 10000
        });
        let err = InsertClub::from_json(&catalog, &payload).unwrap_err();
        assert_eq!(err.detail_for("memberCount").unwrap().reason, Reason::ServerAssigned);
    }

    #[test]
    fn test_membership_role_defaults_to_member() {
        let catalog = Catalog::standard().unwrap();
        let membership = InsertClubMembership::from_json(&catalog, &json!({ "userId": 1, "clubId": 2 }))
            .unwrap()
            .into_row(1, Utc::now());
        assert_eq!(membership.role, "member");

        let officer = InsertClubMembership::from_json(
            &catalog,
            &json!({ "userId": 1, "clubId": 2, "role": "president" }),
        )
        .unwrap()
        .into_row(2, Utc::now());
        assert_eq!(officer.role, "president");
    }

    #[test]
    fn test_membership_requires_both_sides() {
        let catalog = Catalog::standard().unwrap();
        let err = InsertClubMembership::from_json(&catalog, &json!({ "role": "member" })).unwrap_err();
        assert_eq!(err.fields(), vec!["userId", "clubId"]);
    }
}
