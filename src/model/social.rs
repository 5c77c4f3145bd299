//! Profile likes and matches

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, InsertPayload};
use crate::schema::tables::{self, DEFAULT_LIKE_TYPE, DEFAULT_MATCH_TYPE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLike {
    pub id: i32,
    pub liker_id: i32,
    pub liked_id: i32,
    pub like_type: String,
    /// Profile field the like refers to, when not the whole profile
    pub specific_field: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertProfileLike {
    pub liker_id: i32,
    pub liked_id: i32,
    pub like_type: Option<String>,
    pub specific_field: Option<String>,
}

impl Entity for ProfileLike {
    const TABLE: &'static str = tables::PROFILE_LIKES;
    type Insert = InsertProfileLike;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertProfileLike {
        InsertProfileLike {
            liker_id: self.liker_id,
            liked_id: self.liked_id,
            like_type: Some(self.like_type.clone()),
            specific_field: self.specific_field.clone(),
        }
    }
}

impl InsertPayload for InsertProfileLike {
    type Row = ProfileLike;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> ProfileLike {
        ProfileLike {
            id,
            liker_id: self.liker_id,
            liked_id: self.liked_id,
            like_type: self.like_type.unwrap_or_else(|| DEFAULT_LIKE_TYPE.to_string()),
            specific_field: self.specific_field,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i32,
    pub user1_id: i32,
    pub user2_id: i32,
    pub match_type: String,
    pub compatibility_score: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn involves(&self, user_id: i32) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The other side of the match, if `user_id` is part of it
    pub fn partner_of(&self, user_id: i32) -> Option<i32> {
        if self.user1_id == user_id {
            Some(self.user2_id)
        } else if self.user2_id == user_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertMatch {
    pub user1_id: i32,
    pub user2_id: i32,
    pub match_type: Option<String>,
    pub compatibility_score: Option<i32>,
}

impl Entity for Match {
    const TABLE: &'static str = tables::MATCHES;
    type Insert = InsertMatch;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertMatch {
        InsertMatch {
            user1_id: self.user1_id,
            user2_id: self.user2_id,
            match_type: Some(self.match_type.clone()),
            compatibility_score: self.compatibility_score,
        }
    }
}

impl InsertPayload for InsertMatch {
    type Row = Match;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> Match {
        Match {
            id,
            user1_id: self.user1_id,
            user2_id: self.user2_id,
            match_type: self.match_type.unwrap_or_else(|| DEFAULT_MATCH_TYPE.to_string()),
            compatibility_score: self.compatibility_score,
            is_active: true,
            created_at: now,
        }
    }
}
