//! Relation metadata between tables
//!
//! A `One` relation that carries `fields` owns the foreign key; a `One`
//! without fields, or a `Many`, is the inverse side and is resolved through
//! the foreign key declared on the target table. `relation_name`
//! disambiguates when two foreign keys point at the same table.

use serde::{Deserialize, Serialize};

use super::tables::{
    CLUBS, CLUB_MEMBERSHIPS, MATCHES, MESSAGES, PROFILES, PROFILE_LIKES, SHARED_NOTES,
    STUDY_GROUPS, STUDY_GROUP_MEMBERS, USERS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    One,
    Many,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Table the relation is declared on
    pub source: String,
    /// Accessor name (e.g. "sentMessages")
    pub name: String,
    pub kind: RelationKind,
    pub target: String,
    /// Source columns holding the foreign key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Target columns referenced by `fields`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_name: Option<String>,
}

impl Relation {
    pub fn one(source: &str, name: &str, target: &str) -> Self {
        Self::build(source, name, RelationKind::One, target)
    }

    pub fn many(source: &str, name: &str, target: &str) -> Self {
        Self::build(source, name, RelationKind::Many, target)
    }

    fn build(source: &str, name: &str, kind: RelationKind, target: &str) -> Self {
        Self {
            source: source.to_string(),
            name: name.to_string(),
            kind,
            target: target.to_string(),
            fields: Vec::new(),
            references: Vec::new(),
            relation_name: None,
        }
    }

    /// Owning side: `source.column -> target.id`
    pub fn via(mut self, column: &str) -> Self {
        self.fields = vec![column.to_string()];
        self.references = vec!["id".to_string()];
        self
    }

    pub fn named(mut self, relation_name: &str) -> Self {
        self.relation_name = Some(relation_name.to_string());
        self
    }

    /// Whether this side holds the foreign key
    pub fn is_owning(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// All relations of the data model
pub fn all() -> Vec<Relation> {
    vec![
        // users
        Relation::one(USERS, "profile", PROFILES),
        Relation::many(USERS, "clubMemberships", CLUB_MEMBERSHIPS),
        Relation::many(USERS, "studyGroupMemberships", STUDY_GROUP_MEMBERS),
        Relation::many(USERS, "sentMessages", MESSAGES).named("sentMessages"),
        Relation::many(USERS, "receivedMessages", MESSAGES).named("receivedMessages"),
        Relation::many(USERS, "sharedNotes", SHARED_NOTES),
        Relation::many(USERS, "sentLikes", PROFILE_LIKES).named("sentLikes"),
        Relation::many(USERS, "receivedLikes", PROFILE_LIKES).named("receivedLikes"),
        Relation::many(USERS, "matches1", MATCHES).named("matches1"),
        Relation::many(USERS, "matches2", MATCHES).named("matches2"),
        // profiles
        Relation::one(PROFILES, "user", USERS).via("user_id"),
        // clubs
        Relation::many(CLUBS, "memberships", CLUB_MEMBERSHIPS),
        Relation::one(CLUB_MEMBERSHIPS, "user", USERS).via("user_id"),
        Relation::one(CLUB_MEMBERSHIPS, "club", CLUBS).via("club_id"),
        // study groups
        Relation::one(STUDY_GROUPS, "creator", USERS).via("creator_id"),
        Relation::many(STUDY_GROUPS, "members", STUDY_GROUP_MEMBERS),
        Relation::many(STUDY_GROUPS, "messages", MESSAGES),
        Relation::one(STUDY_GROUP_MEMBERS, "user", USERS).via("user_id"),
        Relation::one(STUDY_GROUP_MEMBERS, "studyGroup", STUDY_GROUPS).via("study_group_id"),
        // messages
        Relation::one(MESSAGES, "sender", USERS).via("sender_id").named("sentMessages"),
        Relation::one(MESSAGES, "recipient", USERS).via("recipient_id").named("receivedMessages"),
        Relation::one(MESSAGES, "studyGroup", STUDY_GROUPS).via("study_group_id"),
        // notes
        Relation::one(SHARED_NOTES, "author", USERS).via("author_id"),
        // likes
        Relation::one(PROFILE_LIKES, "liker", USERS).via("liker_id").named("sentLikes"),
        Relation::one(PROFILE_LIKES, "liked", USERS).via("liked_id").named("receivedLikes"),
        // matches
        Relation::one(MATCHES, "user1", USERS).via("user1_id").named("matches1"),
        Relation::one(MATCHES, "user2", USERS).via("user2_id").named("matches2"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_relations_pair_up() {
        let relations = all();
        for rel in relations.iter().filter(|r| r.kind == RelationKind::Many) {
            if let Some(name) = &rel.relation_name {
                let inverse = relations.iter().find(|r| {
                    r.kind == RelationKind::One
                        && r.source == rel.target
                        && r.relation_name.as_deref() == Some(name.as_str())
                });
                assert!(inverse.is_some(), "no inverse for {}", name);
            }
        }
    }

    #[test]
    fn test_owning_side() {
        let rel = Relation::one(PROFILES, "user", USERS).via("user_id");
        assert!(rel.is_owning());
        assert_eq!(rel.references, vec!["id"]);
        assert!(!Relation::one(USERS, "profile", PROFILES).is_owning());
    }
}
