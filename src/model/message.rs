//! Direct and group messages
//!
//! A message stores its target as two nullable foreign keys. Their
//! combination is read back through [`MessageTarget`]; whether the
//! unaddressed and ambiguous shapes are accepted on insert is decided by
//! [`crate::schema::TargetPolicy`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, InsertPayload};
use crate::schema::tables::{self, DEFAULT_MESSAGE_TYPE};

/// Who a message is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    /// Sent to one user
    Direct { recipient_id: i32 },
    /// Posted in a study group
    Group { study_group_id: i32 },
    /// Neither target set
    Unaddressed,
    /// Both targets set
    Ambiguous { recipient_id: i32, study_group_id: i32 },
}

impl MessageTarget {
    fn from_keys(recipient_id: Option<i32>, study_group_id: Option<i32>) -> Self {
        match (recipient_id, study_group_id) {
            (Some(recipient_id), None) => MessageTarget::Direct { recipient_id },
            (None, Some(study_group_id)) => MessageTarget::Group { study_group_id },
            (None, None) => MessageTarget::Unaddressed,
            (Some(recipient_id), Some(study_group_id)) => MessageTarget::Ambiguous {
                recipient_id,
                study_group_id,
            },
        }
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(self, MessageTarget::Direct { .. } | MessageTarget::Group { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i32,
    pub sender_id: i32,
    pub recipient_id: Option<i32>,
    pub study_group_id: Option<i32>,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn target(&self) -> MessageTarget {
        MessageTarget::from_keys(self.recipient_id, self.study_group_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InsertMessage {
    pub sender_id: i32,
    pub recipient_id: Option<i32>,
    pub study_group_id: Option<i32>,
    pub content: String,
    pub message_type: Option<String>,
}

impl InsertMessage {
    /// A text message from one user to another
    pub fn direct(sender_id: i32, recipient_id: i32, content: impl Into<String>) -> Self {
        Self {
            sender_id,
            recipient_id: Some(recipient_id),
            study_group_id: None,
            content: content.into(),
            message_type: None,
        }
    }

    /// A text message posted in a study group
    pub fn group(sender_id: i32, study_group_id: i32, content: impl Into<String>) -> Self {
        Self {
            sender_id,
            recipient_id: None,
            study_group_id: Some(study_group_id),
            content: content.into(),
            message_type: None,
        }
    }

    pub fn target(&self) -> MessageTarget {
        MessageTarget::from_keys(self.recipient_id, self.study_group_id)
    }
}

impl Entity for Message {
    const TABLE: &'static str = tables::MESSAGES;
    type Insert = InsertMessage;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_insert(&self) -> InsertMessage {
        InsertMessage {
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            study_group_id: self.study_group_id,
            content: self.content.clone(),
            message_type: Some(self.message_type.clone()),
        }
    }
}

impl InsertPayload for InsertMessage {
    type Row = Message;

    fn into_row(self, id: i32, now: DateTime<Utc>) -> Message {
        Message {
            id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            study_group_id: self.study_group_id,
            content: self.content,
            message_type: self
                .message_type
                .unwrap_or_else(|| DEFAULT_MESSAGE_TYPE.to_string()),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Catalog, Reason, TargetPolicy, ValidationOptions};
    use serde_json::json;

    #[test]
    fn test_unaddressed_message_accepted_by_default() {
        let catalog = Catalog::standard().unwrap();
        let insert = InsertMessage::from_json(&catalog, &json!({ "senderId": 1, "content": "hello?" }))
            .unwrap();
        assert_eq!(insert.target(), MessageTarget::Unaddressed);

        let message = insert.into_row(1, Utc::now());
        assert_eq!(message.message_type, "text");
        assert!(!message.target().is_exclusive());
    }

    #[test]
    fn test_exclusive_policy_rejects_unaddressed() {
        let catalog = Catalog::standard().unwrap();
        let options = ValidationOptions {
            targets: TargetPolicy::Exclusive,
            ..Default::default()
        };
        let err = InsertMessage::from_json_with(
            &catalog,
            &json!({ "senderId": 1, "content": "hello?" }),
            options,
        )
        .unwrap_err();
        assert_eq!(err.detail_for("target").unwrap().reason, Reason::AmbiguousTarget);

        let group = InsertMessage::from_json_with(
            &catalog,
            &json!({ "senderId": 1, "content": "see you at 5", "studyGroupId": 3 }),
            options,
        )
        .unwrap();
        assert_eq!(group.target(), MessageTarget::Group { study_group_id: 3 });
    }

    #[test]
    fn test_targets() {
        assert_eq!(
            InsertMessage::direct(1, 2, "hi").target(),
            MessageTarget::Direct { recipient_id: 2 }
        );
        let mut both = InsertMessage::group(1, 4, "hi");
        both.recipient_id = Some(2);
        assert_eq!(
            both.target(),
            MessageTarget::Ambiguous { recipient_id: 2, study_group_id: 4 }
        );
    }

    #[test]
    fn test_sender_required() {
        let catalog = Catalog::standard().unwrap();
        let err = InsertMessage::from_json(&catalog, &json!({ "content": "anon" })).unwrap_err();
        assert_eq!(err.fields(), vec!["senderId"]);
    }
}
