//! Storage layer for the activity planner.
//!
//! Provides persistence for activities using `rusqlite`, plus change
//! notification for views that must refresh after a mutation.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Subscribers are required to be `Send` so the whole store can be moved to a
//! worker thread; sharing it still needs external synchronization (e.g. a `Mutex`).
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Activity bounds are stored as local wall-clock TEXT in ISO 8601 without an
//! offset (e.g., `2024-01-15T10:30:00`), matching the JSON interchange format.
//! Values that fail to parse on load are treated as missing bounds, so a bad
//! row degrades to a zero-hour activity instead of failing the whole load.
//!
//! ## Extra Fields
//!
//! The `extra` column stores a JSON object with every field the planner does
//! not model. It is written back unchanged so imports stay lossless.

mod interchange;

use std::fmt;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use cram_core::{Activity, ActivityId, ActivityType, format_timestamp, parse_timestamp};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::{Map, Value};
use thiserror::Error;

pub use interchange::{activities_from_json, activities_to_json};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to encode or decode JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A stored row could not be turned into an activity.
    #[error("invalid activity data for {activity_id}: {message}")]
    InvalidActivityData {
        activity_id: String,
        message: String,
    },
}

/// A mutation that subscribers are told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(ActivityId),
    Updated(ActivityId),
    Deleted(ActivityId),
    Imported { count: usize },
}

/// Handle returned by [`Database::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreChange) + Send>;

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

/// Raw column values of one `activities` row.
struct ActivityRow {
    id: String,
    name: String,
    kind: String,
    category: String,
    subcategory: String,
    start: Option<String>,
    end: Option<String>,
    executed: bool,
    extra: String,
}

impl ActivityRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: row.get(2)?,
            category: row.get(3)?,
            subcategory: row.get(4)?,
            start: row.get(5)?,
            end: row.get(6)?,
            executed: row.get(7)?,
            extra: row.get(8)?,
        })
    }

    fn into_activity(self) -> Result<Activity, DbError> {
        let id = ActivityId::new(self.id.clone()).map_err(|e| DbError::InvalidActivityData {
            activity_id: self.id.clone(),
            message: e.to_string(),
        })?;
        let extra: Map<String, Value> =
            serde_json::from_str(&self.extra).map_err(|e| DbError::InvalidActivityData {
                activity_id: self.id.clone(),
                message: format!("extra fields: {e}"),
            })?;

        Ok(Activity {
            start: load_timestamp(&self.id, "start", self.start.as_deref()),
            end: load_timestamp(&self.id, "end", self.end.as_deref()),
            id,
            name: self.name,
            activity_type: ActivityType::from(self.kind.as_str()),
            executed: self.executed,
            category: self.category,
            subcategory: self.subcategory,
            extra,
        })
    }
}

fn load_timestamp(
    activity_id: &str,
    field: &str,
    raw: Option<&str>,
) -> Option<chrono::NaiveDateTime> {
    let raw = raw?;
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        tracing::warn!(activity_id, field, value = raw, "unparseable timestamp, treating as missing");
    }
    parsed
}

fn now_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

const SELECT_COLUMNS: &str =
    "SELECT id, name, type, category, subcategory, start_at, end_at, executed, extra FROM activities";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DbError> {
        let db = Self {
            conn,
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- start_at/end_at: local ISO 8601 without offset, NULL when missing
            -- extra: JSON object of unmodelled fields
            CREATE TABLE IF NOT EXISTS activities (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                subcategory TEXT NOT NULL DEFAULT '',
                start_at TEXT,
                end_at TEXT,
                executed INTEGER NOT NULL DEFAULT 0,
                extra TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_activities_start ON activities(start_at);
            CREATE INDEX IF NOT EXISTS idx_activities_type ON activities(type);
            ",
        )?;
        Ok(())
    }

    /// Loads every activity in insertion order.
    pub fn load(&self) -> Result<Vec<Activity>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid ASC"))?;
        let rows = stmt.query_map([], ActivityRow::from_row)?;
        let mut activities = Vec::new();
        for row in rows {
            activities.push(row?.into_activity()?);
        }
        tracing::debug!(count = activities.len(), "loaded activities");
        Ok(activities)
    }

    /// Fetches one activity by ID.
    pub fn get(&self, id: &str) -> Result<Option<Activity>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                ActivityRow::from_row,
            )
            .optional()?;
        row.map(ActivityRow::into_activity).transpose()
    }

    /// Number of stored activities.
    pub fn count(&self) -> Result<usize, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM activities", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Inserts a new activity. Fails if the ID already exists.
    pub fn add(&mut self, activity: &Activity) -> Result<(), DbError> {
        let extra = serde_json::to_string(&activity.extra)?;
        let now = now_string();
        self.conn.execute(
            "
            INSERT INTO activities
            (id, name, type, category, subcategory, start_at, end_at, executed, extra, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            ",
            params![
                activity.id.as_str(),
                activity.name,
                activity.activity_type.as_str(),
                activity.category,
                activity.subcategory,
                activity.start.map(format_timestamp),
                activity.end.map(format_timestamp),
                activity.executed,
                extra,
                now,
            ],
        )?;
        tracing::debug!(id = %activity.id, "activity added");
        self.notify(&StoreChange::Added(activity.id.clone()));
        Ok(())
    }

    /// Replaces the stored fields of an existing activity.
    ///
    /// Returns `false` if no activity has that ID.
    pub fn update(&mut self, activity: &Activity) -> Result<bool, DbError> {
        let extra = serde_json::to_string(&activity.extra)?;
        let changed = self.conn.execute(
            "
            UPDATE activities
            SET name = ?2, type = ?3, category = ?4, subcategory = ?5,
                start_at = ?6, end_at = ?7, executed = ?8, extra = ?9, updated_at = ?10
            WHERE id = ?1
            ",
            params![
                activity.id.as_str(),
                activity.name,
                activity.activity_type.as_str(),
                activity.category,
                activity.subcategory,
                activity.start.map(format_timestamp),
                activity.end.map(format_timestamp),
                activity.executed,
                extra,
                now_string(),
            ],
        )?;
        if changed == 0 {
            return Ok(false);
        }
        tracing::debug!(id = %activity.id, "activity updated");
        self.notify(&StoreChange::Updated(activity.id.clone()));
        Ok(true)
    }

    /// Deletes an activity. Returns `false` if no activity has that ID.
    pub fn delete(&mut self, id: &ActivityId) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM activities WHERE id = ?1", params![id.as_str()])?;
        if changed == 0 {
            return Ok(false);
        }
        tracing::debug!(%id, "activity deleted");
        self.notify(&StoreChange::Deleted(id.clone()));
        Ok(true)
    }

    /// Flips the completion flag, returning the new value.
    ///
    /// Returns `None` if no activity has that ID.
    pub fn toggle_executed(&mut self, id: &ActivityId) -> Result<Option<bool>, DbError> {
        let executed: Option<bool> = self
            .conn
            .query_row(
                "
                UPDATE activities
                SET executed = NOT executed, updated_at = ?2
                WHERE id = ?1
                RETURNING executed
                ",
                params![id.as_str(), now_string()],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(executed) = executed {
            tracing::debug!(%id, executed, "activity toggled");
            self.notify(&StoreChange::Updated(id.clone()));
        }
        Ok(executed)
    }

    /// Inserts or replaces a batch of activities in one transaction.
    ///
    /// Existing IDs are overwritten and keep their original position in
    /// [`Database::load`] order. Subscribers get a single notification.
    pub fn import(&mut self, activities: &[Activity]) -> Result<usize, DbError> {
        if activities.is_empty() {
            return Ok(0);
        }
        let now = now_string();
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO activities
                (id, name, type, category, subcategory, start_at, end_at, executed, extra, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    type = excluded.type,
                    category = excluded.category,
                    subcategory = excluded.subcategory,
                    start_at = excluded.start_at,
                    end_at = excluded.end_at,
                    executed = excluded.executed,
                    extra = excluded.extra,
                    updated_at = excluded.updated_at
                ",
            )?;
            for activity in activities {
                let extra = serde_json::to_string(&activity.extra)?;
                written += stmt.execute(params![
                    activity.id.as_str(),
                    activity.name,
                    activity.activity_type.as_str(),
                    activity.category,
                    activity.subcategory,
                    activity.start.map(format_timestamp),
                    activity.end.map(format_timestamp),
                    activity.executed,
                    extra,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(count = written, "activities imported");
        self.notify(&StoreChange::Imported { count: written });
        Ok(written)
    }

    /// Registers a callback invoked synchronously after every mutation.
    ///
    /// Callbacks run in registration order, after the change is committed.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreChange) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() < before
    }

    fn notify(&mut self, change: &StoreChange) {
        for (_, callback) in &mut self.subscribers {
            callback(change);
        }
    }
}
