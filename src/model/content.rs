//! Anonymous vibes and shared notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, InsertPayload};
use crate::schema::tables;

/// Anonymous post; carries no author reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousVibe {
    pub id: i32,
    pub content: String,
    pub category: String,
    pub university: String,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertAnonymousVibe {
    pub content: String,
    pub category: String,
    pub university: String,
}

impl Entity for AnonymousVibe {
    const TABLE: &'static str = tables::ANONYMOUS_VIBES;
    type Insert = InsertAnonymousVibe;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertAnonymousVibe {
        InsertAnonymousVibe {
            content: self.content.clone(),
            category: self.category.clone(),
            university: self.university.clone(),
        }
    }
}

impl InsertPayload for InsertAnonymousVibe {
    type Row = AnonymousVibe;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> AnonymousVibe {
        AnonymousVibe {
            id,
            content: self.content,
            category: self.category,
            university: self.university,
            likes: 0,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedNote {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub subject: String,
    pub author_id: i32,
    pub university: String,
    pub downloads: i32,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertSharedNote {
    pub title: String,
    pub content: String,
    pub subject: String,
    pub author_id: i32,
    pub university: String,
    pub file_url: Option<String>,
}

impl Entity for SharedNote {
    const TABLE: &'static str = tables::SHARED_NOTES;
    type Insert = InsertSharedNote;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertSharedNote {
        InsertSharedNote {
            title: self.title.clone(),
            content: self.content.clone(),
            subject: self.subject.clone(),
            author_id: self.author_id,
            university: self.university.clone(),
            file_url: self.file_url.clone(),
        }
    }
}

impl InsertPayload for InsertSharedNote {
    type Row = SharedNote;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> SharedNote {
        SharedNote {
            id,
            title: self.title,
            content: self.content,
            subject: self.subject,
            author_id: self.author_id,
            university: self.university,
            downloads: 0,
            file_url: self.file_url,
            created_at: now,
        }
    }
}
