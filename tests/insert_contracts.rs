//! Insert Contract Tests
//!
//! Every table's insert schema, exercised through the public API:
//! - A complete payload is accepted
//! - Each missing required field is reported by name
//! - Server-assigned fields are rejected, or stripped on request
//! - Rows converted back to payloads validate again

use serde_json::{json, Value};
use studymatch::model::{
    Entity, InsertAnonymousVibe, InsertClub, InsertClubMembership, InsertMatch, InsertMessage,
    InsertPayload, InsertProfile, InsertProfileLike, InsertSharedNote, InsertStudyGroup,
    InsertStudyGroupMember, InsertUser, MessageTarget,
};
use studymatch::schema::{
    Catalog, InsertValidator, Reason, ServerFieldPolicy, TargetPolicy, ValidationOptions,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn catalog() -> Catalog {
    Catalog::standard().unwrap()
}

/// A minimal valid payload per table
fn valid_payloads() -> Vec<(&'static str, Value)> {
    vec![
        (
            "users",
            json!({
                "email": "a@b.edu",
                "password": "x",
                "firstName": "A",
                "lastName": "B",
                "university": "U",
                "program": "CS",
                "year": "2025"
            }),
        ),
        ("profiles", json!({ "userId": 1 })),
        (
            "clubs",
            json!({
                "name": "Chess",
                "description": "Weekly games",
                "category": "games",
                "university": "U"
            }),
        ),
        ("club_memberships", json!({ "userId": 1, "clubId": 1 })),
        (
            "study_groups",
            json!({
                "name": "Algo",
                "subject": "CS 300",
                "creatorId": 1,
                "university": "U"
            }),
        ),
        ("study_group_members", json!({ "userId": 1, "studyGroupId": 1 })),
        ("messages", json!({ "senderId": 1, "content": "hi" })),
        (
            "anonymous_vibes",
            json!({ "content": "exam week", "category": "stress", "university": "U" }),
        ),
        (
            "shared_notes",
            json!({
                "title": "Week 1",
                "content": "notes",
                "subject": "CS 300",
                "authorId": 1,
                "university": "U"
            }),
        ),
        ("profile_likes", json!({ "likerId": 1, "likedId": 2 })),
        ("matches", json!({ "user1Id": 1, "user2Id": 2 })),
    ]
}

fn rejected_fields(catalog: &Catalog, table: &str, payload: &Value) -> Vec<String> {
    let table = catalog.table(table).unwrap();
    let err = InsertValidator::new(table).validate(payload).unwrap_err();
    err.fields().into_iter().map(String::from).collect()
}

// =============================================================================
// Acceptance Tests
// =============================================================================

/// Every table accepts its minimal payload.
#[test]
fn test_every_table_accepts_minimal_payload() {
    let catalog = catalog();
    for (table, payload) in valid_payloads() {
        let validator = InsertValidator::new(catalog.table(table).unwrap());
        assert!(validator.validate(&payload).is_ok(), "{} rejected {}", table, payload);
    }
}

/// Validation does not depend on anything but its input.
#[test]
fn test_validation_is_deterministic() {
    let catalog = catalog();
    let table = catalog.table("users").unwrap();
    let payload = json!({ "email": "a@b.edu", "id": 4 });

    let first = InsertValidator::new(table).validate(&payload).unwrap_err();
    for _ in 0..50 {
        let again = InsertValidator::new(table).validate(&payload).unwrap_err();
        assert_eq!(first.details(), again.details());
    }
}

/// Dropping any single required key names exactly that key.
#[test]
fn test_each_missing_required_field_is_named() {
    let catalog = catalog();
    for (table, payload) in valid_payloads() {
        let obj = payload.as_object().unwrap();
        for key in obj.keys() {
            let mut partial = obj.clone();
            partial.remove(key);
            let fields = rejected_fields(&catalog, table, &Value::Object(partial));
            assert_eq!(fields, vec![key.clone()], "table {}", table);
        }
    }
}

// =============================================================================
// Server-Assigned Field Tests
// =============================================================================

/// Caller-supplied server values never pass through.
#[test]
fn test_server_assigned_fields_rejected() {
    let catalog = catalog();
    let cases = [
        ("users", "profileComplete", json!(true)),
        ("users", "createdAt", json!("2024-01-01T00:00:00Z")),
        ("profiles", "updatedAt", json!("2024-01-01T00:00:00Z")),
        ("clubs", "memberCount", json!(500)),
        ("club_memberships", "joinedAt", json!("2024-01-01T00:00:00Z")),
        ("study_groups", "currentMembers", json!(6)),
        ("anonymous_vibes", "likes", json!(1000)),
        ("shared_notes", "downloads", json!(1000)),
        ("matches", "isActive", json!(false)),
    ];

    for (table, key, value) in cases {
        let mut payload = valid_payloads()
            .into_iter()
            .find(|(t, _)| *t == table)
            .map(|(_, p)| p)
            .unwrap();
        payload[key] = value;

        let err = InsertValidator::new(catalog.table(table).unwrap())
            .validate(&payload)
            .unwrap_err();
        let detail = err.detail_for(key).unwrap();
        assert_eq!(detail.reason, Reason::ServerAssigned, "{}.{}", table, key);
    }
}

/// An explicit id is server-assigned on every table.
#[test]
fn test_id_never_accepted() {
    let catalog = catalog();
    for (table, mut payload) in valid_payloads() {
        payload["id"] = json!(42);
        assert_eq!(rejected_fields(&catalog, table, &payload), vec!["id"]);
    }
}

/// Strip mode drops server values and keeps the rest.
#[test]
fn test_strip_mode_uses_server_values() {
    let catalog = catalog();
    let options = ValidationOptions {
        server_fields: ServerFieldPolicy::Strip,
        ..Default::default()
    };
    let payload = json!({
        "content": "exam week",
        "category": "stress",
        "university": "U",
        "likes": 1000
    });

    let insert = InsertAnonymousVibe::from_json_with(&catalog, &payload, options).unwrap();
    let row = insert.into_row(1, chrono::Utc::now());
    assert_eq!(row.likes, 0);
}

// =============================================================================
// Entity Behavior Tests
// =============================================================================

/// The canonical user example.
#[test]
fn test_user_example_gets_server_defaults() {
    let catalog = catalog();
    let payload = valid_payloads().remove(0).1;
    let insert = InsertUser::from_json(&catalog, &payload).unwrap();

    let now = chrono::Utc::now();
    let user = insert.into_row(1, now);
    assert_eq!(user.email, "a@b.edu");
    assert!(!user.profile_complete);
    assert_eq!(user.created_at, now);
}

/// A message with neither target is accepted by default.
#[test]
fn test_unaddressed_message_accepted() {
    let catalog = catalog();
    let insert =
        InsertMessage::from_json(&catalog, &json!({ "senderId": 1, "content": "hi" })).unwrap();
    assert_eq!(insert.target(), MessageTarget::Unaddressed);
    assert_eq!(insert.into_row(1, chrono::Utc::now()).message_type, "text");
}

/// Exclusive targets require exactly one of recipient and group.
#[test]
fn test_exclusive_message_targets() {
    let catalog = catalog();
    let options = ValidationOptions {
        targets: TargetPolicy::Exclusive,
        ..Default::default()
    };

    let both = json!({ "senderId": 1, "recipientId": 2, "studyGroupId": 3, "content": "hi" });
    let err = InsertMessage::from_json_with(&catalog, &both, options).unwrap_err();
    assert_eq!(err.detail_for("target").unwrap().reason, Reason::AmbiguousTarget);

    let neither = json!({ "senderId": 1, "content": "hi" });
    assert!(InsertMessage::from_json_with(&catalog, &neither, options).is_err());

    let direct = json!({ "senderId": 1, "recipientId": 2, "content": "hi" });
    let insert = InsertMessage::from_json_with(&catalog, &direct, options).unwrap();
    assert_eq!(insert.target(), MessageTarget::Direct { recipient_id: 2 });
}

/// Varchar limits count characters.
#[test]
fn test_varchar_limit_applies() {
    let catalog = catalog();
    let mut payload = valid_payloads().remove(0).1;
    payload["year"] = json!("y".repeat(51));

    let err = InsertUser::from_json(&catalog, &payload).unwrap_err();
    assert_eq!(err.detail_for("year").unwrap().reason, Reason::TooLong);

    payload["year"] = json!("é".repeat(50));
    assert!(InsertUser::from_json(&catalog, &payload).is_ok());
}

/// Optional columns default when absent and accept explicit nulls.
#[test]
fn test_optional_columns_default() {
    let catalog = catalog();
    let now = chrono::Utc::now();

    let group = InsertStudyGroup::from_json(
        &catalog,
        &json!({
            "name": "Algo",
            "subject": "CS 300",
            "creatorId": 1,
            "university": "U",
            "description": null
        }),
    )
    .unwrap()
    .into_row(1, now);
    assert_eq!(group.max_members, 6);
    assert_eq!(group.current_members, 1);
    assert_eq!(group.description, None);

    let profile = InsertProfile::from_json(&catalog, &json!({ "userId": 1, "photos": null }))
        .unwrap()
        .into_row(1, now);
    assert!(profile.photos.is_empty());

    let like = InsertProfileLike::from_json(&catalog, &json!({ "likerId": 1, "likedId": 2 }))
        .unwrap()
        .into_row(1, now);
    assert_eq!(like.like_type, "profile");

    let m = InsertMatch::from_json(&catalog, &json!({ "user1Id": 1, "user2Id": 2 }))
        .unwrap()
        .into_row(1, now);
    assert!(m.is_active);
    assert_eq!(m.match_type, "study");
}

// =============================================================================
// Row Round-Trip Tests
// =============================================================================

fn assert_round_trip<I>(catalog: &Catalog, payload: &Value)
where
    I: InsertPayload + PartialEq + std::fmt::Debug,
    I::Row: Entity<Insert = I>,
{
    let insert = I::from_json(catalog, payload).unwrap();
    let row = insert.into_row(7, chrono::Utc::now());
    assert_eq!(row.id(), 7);

    let back = serde_json::to_value(row.to_insert()).unwrap();
    let again = I::from_json(catalog, &back).unwrap();
    assert_eq!(again, row.to_insert());
}

/// A stored row's insertable fields form a valid payload.
#[test]
fn test_rows_convert_back_to_valid_payloads() {
    let catalog = catalog();
    let payloads = valid_payloads();
    let p = |name: &str| payloads.iter().find(|(t, _)| *t == name).unwrap().1.clone();

    assert_round_trip::<InsertUser>(&catalog, &p("users"));
    assert_round_trip::<InsertProfile>(&catalog, &p("profiles"));
    assert_round_trip::<InsertClub>(&catalog, &p("clubs"));
    assert_round_trip::<InsertClubMembership>(&catalog, &p("club_memberships"));
    assert_round_trip::<InsertStudyGroup>(&catalog, &p("study_groups"));
    assert_round_trip::<InsertStudyGroupMember>(&catalog, &p("study_group_members"));
    assert_round_trip::<InsertMessage>(&catalog, &p("messages"));
    assert_round_trip::<InsertAnonymousVibe>(&catalog, &p("anonymous_vibes"));
    assert_round_trip::<InsertSharedNote>(&catalog, &p("shared_notes"));
    assert_round_trip::<InsertProfileLike>(&catalog, &p("profile_likes"));
    assert_round_trip::<InsertMatch>(&catalog, &p("matches"));
}
