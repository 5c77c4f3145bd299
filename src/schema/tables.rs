//! Table declarations for the campus study-matching data model
//!
//! Tables are listed in dependency order: every foreign key points at a
//! table declared earlier.

use super::types::{ColumnDef, ColumnDefault, ColumnType, TableDef};

pub const USERS: &str = "users";
pub const PROFILES: &str = "profiles";
pub const CLUBS: &str = "clubs";
pub const CLUB_MEMBERSHIPS: &str = "club_memberships";
pub const STUDY_GROUPS: &str = "study_groups";
pub const STUDY_GROUP_MEMBERS: &str = "study_group_members";
pub const MESSAGES: &str = "messages";
pub const ANONYMOUS_VIBES: &str = "anonymous_vibes";
pub const SHARED_NOTES: &str = "shared_notes";
pub const PROFILE_LIKES: &str = "profile_likes";
pub const MATCHES: &str = "matches";

pub const DEFAULT_MEMBER_ROLE: &str = "member";
pub const DEFAULT_MESSAGE_TYPE: &str = "text";
pub const DEFAULT_LIKE_TYPE: &str = "profile";
pub const DEFAULT_MATCH_TYPE: &str = "study";
pub const DEFAULT_MAX_MEMBERS: i32 = 6;
pub const DEFAULT_CURRENT_MEMBERS: i32 = 1;

/// Every table, in dependency order
pub fn all() -> Vec<TableDef> {
    vec![
        users(),
        profiles(),
        clubs(),
        club_memberships(),
        study_groups(),
        study_group_members(),
        messages(),
        anonymous_vibes(),
        shared_notes(),
        profile_likes(),
        matches(),
    ]
}

fn counter(key: &str, column: &str, initial: i32) -> ColumnDef {
    ColumnDef::new(key, column, ColumnType::Integer)
        .default_value(ColumnDefault::Int(initial))
        .server_assigned()
}

fn string_list(key: &str, column: &str) -> ColumnDef {
    ColumnDef::new(key, column, ColumnType::StringList).default_value(ColumnDefault::EmptyList)
}

fn labelled(key: &str, column: &str, length: usize, default: &str) -> ColumnDef {
    ColumnDef::new(key, column, ColumnType::Varchar { length })
        .default_value(ColumnDefault::Text(default.to_string()))
}

pub fn users() -> TableDef {
    TableDef::new(
        USERS,
        "User",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_varchar("email", "email", 255).unique(),
            ColumnDef::required_text("password", "password"),
            ColumnDef::required_varchar("firstName", "first_name", 100),
            ColumnDef::required_varchar("lastName", "last_name", 100),
            ColumnDef::required_varchar("university", "university", 255),
            ColumnDef::required_varchar("program", "program", 255),
            ColumnDef::required_varchar("year", "year", 50),
            ColumnDef::new("profileComplete", "profile_complete", ColumnType::Boolean)
                .default_value(ColumnDefault::Bool(false))
                .server_assigned(),
            ColumnDef::stamped("createdAt", "created_at"),
        ],
    )
}

pub fn profiles() -> TableDef {
    TableDef::new(
        PROFILES,
        "Profile",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_ref("userId", "user_id", USERS),
            ColumnDef::optional_text("bio", "bio"),
            ColumnDef::optional_text("studyStyle", "study_style"),
            ColumnDef::optional_text("studySpot", "study_spot"),
            string_list("photos", "photos"),
            string_list("classes", "classes"),
            string_list("activities", "activities"),
            string_list("interests", "interests"),
            string_list("studyHabits", "study_habits"),
            ColumnDef::stamped("updatedAt", "updated_at"),
        ],
    )
}

pub fn clubs() -> TableDef {
    TableDef::new(
        CLUBS,
        "Club",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_varchar("name", "name", 255),
            ColumnDef::required_text("description", "description"),
            ColumnDef::required_varchar("category", "category", 100),
            ColumnDef::required_varchar("university", "university", 255),
            counter("memberCount", "member_count", 0),
            ColumnDef::optional_text("image", "image"),
            ColumnDef::stamped("createdAt", "created_at"),
        ],
    )
}

pub fn club_memberships() -> TableDef {
    TableDef::new(
        CLUB_MEMBERSHIPS,
        "ClubMembership",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_ref("userId", "user_id", USERS),
            ColumnDef::required_ref("clubId", "club_id", CLUBS),
            labelled("role", "role", 50, DEFAULT_MEMBER_ROLE),
            ColumnDef::stamped("joinedAt", "joined_at"),
        ],
    )
}

pub fn study_groups() -> TableDef {
    TableDef::new(
        STUDY_GROUPS,
        "StudyGroup",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_varchar("name", "name", 255),
            ColumnDef::optional_text("description", "description"),
            ColumnDef::required_varchar("subject", "subject", 255),
            ColumnDef::new("maxMembers", "max_members", ColumnType::Integer)
                .default_value(ColumnDefault::Int(DEFAULT_MAX_MEMBERS)),
            counter("currentMembers", "current_members", DEFAULT_CURRENT_MEMBERS),
            ColumnDef::required_ref("creatorId", "creator_id", USERS),
            ColumnDef::required_varchar("university", "university", 255),
            ColumnDef::optional_text("meetingTime", "meeting_time"),
            ColumnDef::optional_text("location", "location"),
            ColumnDef::stamped("createdAt", "created_at"),
        ],
    )
}

pub fn study_group_members() -> TableDef {
    TableDef::new(
        STUDY_GROUP_MEMBERS,
        "StudyGroupMember",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_ref("userId", "user_id", USERS),
            ColumnDef::required_ref("studyGroupId", "study_group_id", STUDY_GROUPS),
            ColumnDef::stamped("joinedAt", "joined_at"),
        ],
    )
}

pub fn messages() -> TableDef {
    TableDef::new(
        MESSAGES,
        "Message",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_ref("senderId", "sender_id", USERS),
            ColumnDef::optional_ref("recipientId", "recipient_id", USERS),
            ColumnDef::optional_ref("studyGroupId", "study_group_id", STUDY_GROUPS),
            ColumnDef::required_text("content", "content"),
            labelled("messageType", "message_type", 50, DEFAULT_MESSAGE_TYPE),
            ColumnDef::stamped("createdAt", "created_at"),
        ],
    )
    .with_exclusive("target", &["recipientId", "studyGroupId"])
}

/// No author column: vibes are anonymous
pub fn anonymous_vibes() -> TableDef {
    TableDef::new(
        ANONYMOUS_VIBES,
        "AnonymousVibe",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_text("content", "content"),
            ColumnDef::required_varchar("category", "category", 100),
            ColumnDef::required_varchar("university", "university", 255),
            counter("likes", "likes", 0),
            ColumnDef::stamped("createdAt", "created_at"),
        ],
    )
}

pub fn shared_notes() -> TableDef {
    TableDef::new(
        SHARED_NOTES,
        "SharedNote",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_varchar("title", "title", 255),
            ColumnDef::required_text("content", "content"),
            ColumnDef::required_varchar("subject", "subject", 255),
            ColumnDef::required_ref("authorId", "author_id", USERS),
            ColumnDef::required_varchar("university", "university", 255),
            counter("downloads", "downloads", 0),
            ColumnDef::optional_text("fileUrl", "file_url"),
            ColumnDef::stamped("createdAt", "created_at"),
        ],
    )
}

pub fn profile_likes() -> TableDef {
    TableDef::new(
        PROFILE_LIKES,
        "ProfileLike",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_ref("likerId", "liker_id", USERS),
            ColumnDef::required_ref("likedId", "liked_id", USERS),
            labelled("likeType", "like_type", 50, DEFAULT_LIKE_TYPE),
            ColumnDef::new("specificField", "specific_field", ColumnType::Varchar { length: 100 }),
            ColumnDef::stamped("createdAt", "created_at"),
        ],
    )
}

pub fn matches() -> TableDef {
    TableDef::new(
        MATCHES,
        "Match",
        vec![
            ColumnDef::serial_id(),
            ColumnDef::required_ref("user1Id", "user1_id", USERS),
            ColumnDef::required_ref("user2Id", "user2_id", USERS),
            labelled("matchType", "match_type", 50, DEFAULT_MATCH_TYPE),
            ColumnDef::new("compatibilityScore", "compatibility_score", ColumnType::Integer),
            ColumnDef::new("isActive", "is_active", ColumnType::Boolean)
                .default_value(ColumnDefault::Bool(true))
                .server_assigned(),
            ColumnDef::stamped("createdAt", "created_at"),
        ],
    )
}
