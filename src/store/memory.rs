//! In-memory row store
//!
//! Reference implementation of the data-access contract the schema is
//! written for:
//! - ids are assigned per table, starting at 1
//! - foreign keys must point at existing rows
//! - `users.email` is unique and a user owns at most one profile
//! - `clubs.member_count` and `study_groups.current_members` are bumped in
//!   the same write section as the membership row
//! - a study group accepts no member once `current_members` reaches
//!   `max_members`
//! - every typed payload passes its table's insert validator before it is
//!   stored, so stored rows always convert back into valid payloads

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::clock::{Clock, SystemClock};
use super::errors::{StoreError, StoreResult};
use crate::model::*;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::tables::{
    ANONYMOUS_VIBES, CLUBS, CLUB_MEMBERSHIPS, MATCHES, MESSAGES, PROFILES, PROFILE_LIKES,
    SHARED_NOTES, STUDY_GROUPS, STUDY_GROUP_MEMBERS, USERS,
};
use crate::schema::{Catalog, InsertValidator, SchemaError, ValidationOptions};

struct TableRows<T> {
    next_id: i32,
    rows: Vec<T>,
}

impl<T> Default for TableRows<T> {
    fn default() -> Self {
        Self { next_id: 1, rows: Vec::new() }
    }
}

impl<T: Entity> TableRows<T> {
    fn get(&self, id: i32) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    fn get_mut(&mut self, id: i32) -> Option<&mut T> {
        self.rows.iter_mut().find(|r| r.id() == id)
    }

    fn exists(&self, id: i32) -> bool {
        self.get(id).is_some()
    }

    fn push<I: InsertPayload<Row = T>>(&mut self, insert: I, now: DateTime<Utc>) -> T {
        let row = insert.into_row(self.next_id, now);
        self.next_id += 1;
        self.rows.push(row.clone());
        row
    }
}

#[derive(Default)]
struct Tables {
    users: TableRows<User>,
    profiles: TableRows<Profile>,
    clubs: TableRows<Club>,
    club_memberships: TableRows<ClubMembership>,
    study_groups: TableRows<StudyGroup>,
    study_group_members: TableRows<StudyGroupMember>,
    messages: TableRows<Message>,
    anonymous_vibes: TableRows<AnonymousVibe>,
    shared_notes: TableRows<SharedNote>,
    profile_likes: TableRows<ProfileLike>,
    matches: TableRows<Match>,
}

/// In-memory store for every entity of the catalog
pub struct MemoryStore {
    catalog: Catalog,
    options: ValidationOptions,
    clock: Arc<dyn Clock>,
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            options: ValidationOptions::default(),
            clock: Arc::new(SystemClock),
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Validator options applied to every insert
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::StorageError("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::StorageError("Lock poisoned".to_string()))
    }

    /// Runs the table's insert validator over a typed payload.
    fn check<I: InsertPayload>(&self, insert: &I) -> StoreResult<()> {
        let table = self.catalog.table(<I::Row as Entity>::TABLE)?;
        let value =
            serde_json::to_value(insert).map_err(|e| StoreError::StorageError(e.to_string()))?;
        InsertValidator::with_options(table, self.options)
            .validate(&value)
            .map_err(rejected)?;
        Ok(())
    }

    // ==================
    // Untrusted input
    // ==================

    /// Validates an untrusted payload for `table`, inserts it, and returns
    /// the stored row as JSON.
    pub fn insert_json(&self, table: &str, payload: &Value) -> StoreResult<Value> {
        match table {
            USERS => self.insert_json_as(payload, |s, p| s.insert_user(p)),
            PROFILES => self.insert_json_as(payload, |s, p| s.insert_profile(p)),
            CLUBS => self.insert_json_as(payload, |s, p| s.insert_club(p)),
            CLUB_MEMBERSHIPS => self.insert_json_as(payload, |s, p| s.insert_club_membership(p)),
            STUDY_GROUPS => self.insert_json_as(payload, |s, p| s.insert_study_group(p)),
            STUDY_GROUP_MEMBERS => {
                self.insert_json_as(payload, |s, p| s.insert_study_group_member(p))
            }
            MESSAGES => self.insert_json_as(payload, |s, p| s.insert_message(p)),
            ANONYMOUS_VIBES => self.insert_json_as(payload, |s, p| s.insert_anonymous_vibe(p)),
            SHARED_NOTES => self.insert_json_as(payload, |s, p| s.insert_shared_note(p)),
            PROFILE_LIKES => self.insert_json_as(payload, |s, p| s.insert_profile_like(p)),
            MATCHES => self.insert_json_as(payload, |s, p| s.insert_match(p)),
            other => Err(StoreError::Rejected(SchemaError::unknown_table(other))),
        }
    }

    fn insert_json_as<I, R, F>(&self, payload: &Value, insert: F) -> StoreResult<Value>
    where
        I: InsertPayload,
        R: Serialize,
        F: FnOnce(&Self, I) -> StoreResult<R>,
    {
        let decoded =
            I::from_json_with(&self.catalog, payload, self.options).map_err(rejected)?;
        let row = insert(self, decoded)?;
        serde_json::to_value(row).map_err(|e| StoreError::StorageError(e.to_string()))
    }

    // ==================
    // Typed inserts
    // ==================

    pub fn insert_user(&self, insert: InsertUser) -> StoreResult<User> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        if tables.users.rows.iter().any(|u| u.email == insert.email) {
            return Err(conflict(StoreError::DuplicateEmail(insert.email)));
        }
        let row = tables.users.push(insert, self.clock.now());
        inserted(USERS, row.id);
        Ok(row)
    }

    pub fn insert_profile(&self, insert: InsertProfile) -> StoreResult<Profile> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        require(tables.users.exists(insert.user_id), PROFILES, "user_id", USERS, insert.user_id)?;
        if tables.profiles.rows.iter().any(|p| p.user_id == insert.user_id) {
            return Err(conflict(StoreError::DuplicateProfile(insert.user_id)));
        }
        let row = tables.profiles.push(insert, self.clock.now());
        inserted(PROFILES, row.id);
        Ok(row)
    }

    pub fn insert_club(&self, insert: InsertClub) -> StoreResult<Club> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        let row = tables.clubs.push(insert, self.clock.now());
        inserted(CLUBS, row.id);
        Ok(row)
    }

    pub fn insert_club_membership(&self, insert: InsertClubMembership) -> StoreResult<ClubMembership> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        require(tables.users.exists(insert.user_id), CLUB_MEMBERSHIPS, "user_id", USERS, insert.user_id)?;
        require(tables.clubs.exists(insert.club_id), CLUB_MEMBERSHIPS, "club_id", CLUBS, insert.club_id)?;

        let row = tables.club_memberships.push(insert, self.clock.now());
        if let Some(club) = tables.clubs.get_mut(row.club_id) {
            club.member_count += 1;
        }
        inserted(CLUB_MEMBERSHIPS, row.id);
        Ok(row)
    }

    pub fn insert_study_group(&self, insert: InsertStudyGroup) -> StoreResult<StudyGroup> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        require(tables.users.exists(insert.creator_id), STUDY_GROUPS, "creator_id", USERS, insert.creator_id)?;
        let row = tables.study_groups.push(insert, self.clock.now());
        inserted(STUDY_GROUPS, row.id);
        Ok(row)
    }

    pub fn insert_study_group_member(
        &self,
        insert: InsertStudyGroupMember,
    ) -> StoreResult<StudyGroupMember> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        require(tables.users.exists(insert.user_id), STUDY_GROUP_MEMBERS, "user_id", USERS, insert.user_id)?;
        require(
            tables.study_groups.exists(insert.study_group_id),
            STUDY_GROUP_MEMBERS,
            "study_group_id",
            STUDY_GROUPS,
            insert.study_group_id,
        )?;
        if tables
            .study_groups
            .get(insert.study_group_id)
            .map_or(false, StudyGroup::is_full)
        {
            return Err(conflict(StoreError::GroupFull(insert.study_group_id)));
        }

        let row = tables.study_group_members.push(insert, self.clock.now());
        if let Some(group) = tables.study_groups.get_mut(row.study_group_id) {
            group.current_members += 1;
        }
        inserted(STUDY_GROUP_MEMBERS, row.id);
        Ok(row)
    }

    pub fn insert_message(&self, insert: InsertMessage) -> StoreResult<Message> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        require(tables.users.exists(insert.sender_id), MESSAGES, "sender_id", USERS, insert.sender_id)?;
        if let Some(id) = insert.recipient_id {
            require(tables.users.exists(id), MESSAGES, "recipient_id", USERS, id)?;
        }
        if let Some(id) = insert.study_group_id {
            require(tables.study_groups.exists(id), MESSAGES, "study_group_id", STUDY_GROUPS, id)?;
        }
        let row = tables.messages.push(insert, self.clock.now());
        inserted(MESSAGES, row.id);
        Ok(row)
    }

    pub fn insert_anonymous_vibe(&self, insert: InsertAnonymousVibe) -> StoreResult<AnonymousVibe> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        let row = tables.anonymous_vibes.push(insert, self.clock.now());
        inserted(ANONYMOUS_VIBES, row.id);
        Ok(row)
    }

    pub fn insert_shared_note(&self, insert: InsertSharedNote) -> StoreResult<SharedNote> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        require(tables.users.exists(insert.author_id), SHARED_NOTES, "author_id", USERS, insert.author_id)?;
        let row = tables.shared_notes.push(insert, self.clock.now());
        inserted(SHARED_NOTES, row.id);
        Ok(row)
    }

    pub fn insert_profile_like(&self, insert: InsertProfileLike) -> StoreResult<ProfileLike> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        require(tables.users.exists(insert.liker_id), PROFILE_LIKES, "liker_id", USERS, insert.liker_id)?;
        require(tables.users.exists(insert.liked_id), PROFILE_LIKES, "liked_id", USERS, insert.liked_id)?;
        let row = tables.profile_likes.push(insert, self.clock.now());
        inserted(PROFILE_LIKES, row.id);
        Ok(row)
    }

    pub fn insert_match(&self, insert: InsertMatch) -> StoreResult<Match> {
        self.check(&insert)?;
        let mut tables = self.write()?;
        require(tables.users.exists(insert.user1_id), MATCHES, "user1_id", USERS, insert.user1_id)?;
        require(tables.users.exists(insert.user2_id), MATCHES, "user2_id", USERS, insert.user2_id)?;
        let row = tables.matches.push(insert, self.clock.now());
        inserted(MATCHES, row.id);
        Ok(row)
    }

    // ==================
    // Lookups
    // ==================

    pub fn get_user(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.rows.iter().find(|u| u.email == email).cloned())
    }

    pub fn get_profile(&self, id: i32) -> StoreResult<Option<Profile>> {
        Ok(self.read()?.profiles.get(id).cloned())
    }

    pub fn profile_of(&self, user_id: i32) -> StoreResult<Option<Profile>> {
        Ok(self.read()?.profiles.rows.iter().find(|p| p.user_id == user_id).cloned())
    }

    pub fn get_club(&self, id: i32) -> StoreResult<Option<Club>> {
        Ok(self.read()?.clubs.get(id).cloned())
    }

    pub fn get_club_membership(&self, id: i32) -> StoreResult<Option<ClubMembership>> {
        Ok(self.read()?.club_memberships.get(id).cloned())
    }

    pub fn get_study_group(&self, id: i32) -> StoreResult<Option<StudyGroup>> {
        Ok(self.read()?.study_groups.get(id).cloned())
    }

    pub fn get_study_group_member(&self, id: i32) -> StoreResult<Option<StudyGroupMember>> {
        Ok(self.read()?.study_group_members.get(id).cloned())
    }

    pub fn get_message(&self, id: i32) -> StoreResult<Option<Message>> {
        Ok(self.read()?.messages.get(id).cloned())
    }

    pub fn get_anonymous_vibe(&self, id: i32) -> StoreResult<Option<AnonymousVibe>> {
        Ok(self.read()?.anonymous_vibes.get(id).cloned())
    }

    pub fn get_shared_note(&self, id: i32) -> StoreResult<Option<SharedNote>> {
        Ok(self.read()?.shared_notes.get(id).cloned())
    }

    pub fn get_profile_like(&self, id: i32) -> StoreResult<Option<ProfileLike>> {
        Ok(self.read()?.profile_likes.get(id).cloned())
    }

    pub fn get_match(&self, id: i32) -> StoreResult<Option<Match>> {
        Ok(self.read()?.matches.get(id).cloned())
    }

    /// Number of rows stored in `table`, or `None` for an unknown table
    pub fn row_count(&self, table: &str) -> StoreResult<Option<usize>> {
        let tables = self.read()?;
        let count = match table {
            USERS => tables.users.rows.len(),
            PROFILES => tables.profiles.rows.len(),
            CLUBS => tables.clubs.rows.len(),
            CLUB_MEMBERSHIPS => tables.club_memberships.rows.len(),
            STUDY_GROUPS => tables.study_groups.rows.len(),
            STUDY_GROUP_MEMBERS => tables.study_group_members.rows.len(),
            MESSAGES => tables.messages.rows.len(),
            ANONYMOUS_VIBES => tables.anonymous_vibes.rows.len(),
            SHARED_NOTES => tables.shared_notes.rows.len(),
            PROFILE_LIKES => tables.profile_likes.rows.len(),
            MATCHES => tables.matches.rows.len(),
            _ => return Ok(None),
        };
        Ok(Some(count))
    }
}

fn require(
    present: bool,
    table: &'static str,
    column: &'static str,
    target: &'static str,
    id: i32,
) -> StoreResult<()> {
    if present {
        Ok(())
    } else {
        Err(conflict(StoreError::ForeignKey { table, column, target, id }))
    }
}

fn rejected(err: SchemaError) -> StoreError {
    let table = err.table().unwrap_or("").to_string();
    let fields = err.fields().join(",");
    log_event_with_fields(Event::InsertRejected, &[("table", &table), ("fields", &fields)]);
    StoreError::Rejected(err)
}

fn conflict(err: StoreError) -> StoreError {
    let message = err.to_string();
    log_event_with_fields(Event::InsertConflict, &[("code", err.code()), ("message", &message)]);
    err
}

fn inserted(table: &str, id: i32) {
    let id = id.to_string();
    log_event_with_fields(Event::RowInserted, &[("id", &id), ("table", table)]);
}
