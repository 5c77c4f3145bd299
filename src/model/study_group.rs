//! Study groups and their members

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, InsertPayload};
use crate::schema::tables::{self, DEFAULT_CURRENT_MEMBERS, DEFAULT_MAX_MEMBERS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroup {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub subject: String,
    pub max_members: i32,
    /// Starts at 1 for the creator
    pub current_members: i32,
    pub creator_id: i32,
    pub university: String,
    pub meeting_time: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StudyGroup {
    pub fn is_full(&self) -> bool {
        self.current_members >= self.max_members
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertStudyGroup {
    pub name: String,
    pub description: Option<String>,
    pub subject: String,
    pub max_members: Option<i32>,
    pub creator_id: i32,
    pub university: String,
    pub meeting_time: Option<String>,
    pub location: Option<String>,
}

impl Entity for StudyGroup {
    const TABLE: &'static str = tables::STUDY_GROUPS;
    type Insert = InsertStudyGroup;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertStudyGroup {
        InsertStudyGroup {
            name: self.name.clone(),
            description: self.description.clone(),
            subject: self.subject.clone(),
            max_members: Some(self.max_members),
            creator_id: self.creator_id,
            university: self.university.clone(),
            meeting_time: self.meeting_time.clone(),
            location: self.location.clone(),
        }
    }
}

impl InsertPayload for InsertStudyGroup {
    type Row = StudyGroup;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> StudyGroup {
        StudyGroup {
            id,
            name: self.name,
            description: self.description,
            subject: self.subject,
            max_members: self.max_members.unwrap_or(DEFAULT_MAX_MEMBERS),
            current_members: DEFAULT_CURRENT_MEMBERS,
            creator_id: self.creator_id,
            university: self.university,
            meeting_time: self.meeting_time,
            location: self.location,
            created_at: now,
        }
    }
}

/// Join row between a user and a study group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroupMember {
    pub id: i32,
    pub user_id: i32,
    pub study_group_id: i32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertStudyGroupMember {
    pub user_id: i32,
    pub study_group_id: i32,
}

impl Entity for StudyGroupMember {
    const TABLE: &'static str = tables::STUDY_GROUP_MEMBERS;
    type Insert = InsertStudyGroupMember;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertStudyGroupMember {
        InsertStudyGroupMember {
            user_id: self.user_id,
            study_group_id: self.study_group_id,
        }
    }
}

impl InsertPayload for InsertStudyGroupMember {
    type Row = StudyGroupMember;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> StudyGroupMember {
        StudyGroupMember {
            id,
            user_id: self.user_id,
            study_group_id: self.study_group_id,
            joined_at: now,
        }
    }
}
