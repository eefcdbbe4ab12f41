//! Record lifecycle: transactional create, update and delete
//!
//! Every operation runs in exactly one transaction: begin, run the statements, then
//! commit on success or roll back on any error. The transaction owns the pooled
//! connection, so the connection goes back to the pool on every exit path (commit,
//! rollback, or drop on an early return). Nothing is visible to other readers before
//! the commit completes.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::db::models::{ArtistFields, RecordRef, ShowFields, VenueFields};
use crate::db::{artists, shows, venues};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Venue,
    Artist,
    Show,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Venue => "Venue",
            EntityKind::Artist => "Artist",
            EntityKind::Show => "Show",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    /// Past participle used in success messages
    fn verb(self) -> &'static str {
        match self {
            Action::Create => "listed",
            Action::Update => "updated",
            Action::Delete => "deleted",
        }
    }

    /// Past participle used in failure messages; a failed update reads as an edit
    fn failure_verb(self) -> &'static str {
        match self {
            Action::Update => "edited",
            other => other.verb(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        })
    }
}

/// What to do with shows that reference a venue or artist being deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Refuse while dependent shows exist
    #[default]
    Restrict,
    /// Delete dependent shows in the same transaction
    Cascade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// False when no row had the id (still a success)
    pub deleted: bool,
    pub shows_removed: u64,
}

/// One lifecycle operation, used for logging and message composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub entity: EntityKind,
    pub action: Action,
    /// Record name as submitted; empty for shows
    pub label: String,
}

impl Operation {
    pub fn new(entity: EntityKind, action: Action, label: impl Into<String>) -> Self {
        Self {
            entity,
            action,
            label: label.into(),
        }
    }

    fn subject(&self) -> String {
        if self.label.is_empty() {
            self.entity.to_string()
        } else {
            format!("{} {}", self.entity, self.label)
        }
    }

    /// e.g. `Venue The Musical Hop was successfully listed!`
    pub fn success_message(&self) -> String {
        format!("{} was successfully {}!", self.subject(), self.action.verb())
    }

    /// e.g. `An error occurred. Venue The Musical Hop could not be listed.`
    pub fn failure_message(&self) -> String {
        format!(
            "An error occurred. {} could not be {}.",
            self.subject(),
            self.action.failure_verb()
        )
    }

    fn failed(&self, source: Error) -> LifecycleError {
        error!(
            entity = %self.entity,
            action = %self.action,
            label = %self.label,
            "Lifecycle operation failed: {}",
            source
        );
        LifecycleError {
            operation: self.clone(),
            source,
        }
    }
}

/// Failed lifecycle operation; the transaction has been rolled back
#[derive(Debug, Error)]
#[error("{} {} failed: {source}", .operation.action, .operation.entity)]
pub struct LifecycleError {
    pub operation: Operation,
    #[source]
    pub source: Error,
}

impl LifecycleError {
    pub fn flash_message(&self) -> String {
        self.operation.failure_message()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.source, Error::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self.source, Error::Conflict(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self.source, Error::InvalidInput(_))
    }
}

pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;

async fn begin<'a>(pool: &'a SqlitePool, op: &Operation) -> LifecycleResult<Transaction<'a, Sqlite>> {
    pool.begin().await.map_err(|e| op.failed(e.into()))
}

/// Commit on success, roll back on failure; consumes the transaction either way
async fn finish<T>(
    tx: Transaction<'_, Sqlite>,
    outcome: crate::Result<T>,
    op: &Operation,
) -> LifecycleResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await.map_err(|e| op.failed(e.into()))?;
            info!(entity = %op.entity, action = %op.action, label = %op.label, "Committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                // Dropping the connection still discards the transaction
                warn!("Rollback after failed {} {} also failed: {}", op.action, op.entity, rollback_err);
            }
            Err(op.failed(err))
        }
    }
}

/// Insert a venue, returning its id
pub async fn create_venue(pool: &SqlitePool, fields: &VenueFields) -> LifecycleResult<i64> {
    let op = Operation::new(EntityKind::Venue, Action::Create, &fields.name);
    let mut tx = begin(pool, &op).await?;
    let outcome = venues::insert_venue(&mut tx, fields).await;
    finish(tx, outcome, &op).await
}

/// Overwrite a venue; `NotFound` when the id is unknown
pub async fn update_venue(pool: &SqlitePool, id: i64, fields: &VenueFields) -> LifecycleResult<()> {
    let op = Operation::new(EntityKind::Venue, Action::Update, &fields.name);
    let mut tx = begin(pool, &op).await?;
    let outcome = match venues::update_venue(&mut tx, id, fields).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(Error::NotFound(format!("Venue {}", id))),
        Err(e) => Err(e),
    };
    finish(tx, outcome, &op).await
}

/// Delete a venue; deleting an unknown id succeeds with `deleted: false`
pub async fn delete_venue(pool: &SqlitePool, id: i64, policy: DeletePolicy) -> LifecycleResult<DeleteOutcome> {
    let op = Operation::new(EntityKind::Venue, Action::Delete, format!("#{}", id));
    let mut tx = begin(pool, &op).await?;
    let outcome = delete_with_dependents(&mut tx, ShowOwner::Venue, id, policy).await;
    finish(tx, outcome, &op).await
}

/// Insert an artist, returning its id
pub async fn create_artist(pool: &SqlitePool, fields: &ArtistFields) -> LifecycleResult<i64> {
    let op = Operation::new(EntityKind::Artist, Action::Create, &fields.name);
    let mut tx = begin(pool, &op).await?;
    let outcome = artists::insert_artist(&mut tx, fields).await;
    finish(tx, outcome, &op).await
}

/// Overwrite an artist; `NotFound` when the id is unknown
pub async fn update_artist(pool: &SqlitePool, id: i64, fields: &ArtistFields) -> LifecycleResult<()> {
    let op = Operation::new(EntityKind::Artist, Action::Update, &fields.name);
    let mut tx = begin(pool, &op).await?;
    let outcome = match artists::update_artist(&mut tx, id, fields).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(Error::NotFound(format!("Artist {}", id))),
        Err(e) => Err(e),
    };
    finish(tx, outcome, &op).await
}

/// Delete an artist; deleting an unknown id succeeds with `deleted: false`
pub async fn delete_artist(pool: &SqlitePool, id: i64, policy: DeletePolicy) -> LifecycleResult<DeleteOutcome> {
    let op = Operation::new(EntityKind::Artist, Action::Delete, format!("#{}", id));
    let mut tx = begin(pool, &op).await?;
    let outcome = delete_with_dependents(&mut tx, ShowOwner::Artist, id, policy).await;
    finish(tx, outcome, &op).await
}

/// Insert a show after resolving its artist and venue, returning its id
///
/// All statements, including the optional artist image fill, share one transaction.
pub async fn create_show(pool: &SqlitePool, fields: &ShowFields) -> LifecycleResult<i64> {
    let op = Operation::new(EntityKind::Show, Action::Create, "");
    let mut tx = begin(pool, &op).await?;

    let outcome = async {
        let artist_id = resolve_artist(&mut tx, &fields.artist).await?;
        let venue_id = resolve_venue(&mut tx, &fields.venue).await?;

        if let Some(image) = fields.artist_image_link.as_deref() {
            artists::fill_missing_image(&mut tx, artist_id, image).await?;
        }

        shows::insert_show(&mut tx, artist_id, venue_id, fields.start_time).await
    }
    .await;

    finish(tx, outcome, &op).await
}

async fn resolve_artist(conn: &mut SqliteConnection, reference: &RecordRef) -> crate::Result<i64> {
    let found = match reference {
        RecordRef::Id(id) => artists::get_artist(&mut *conn, *id).await?.map(|a| a.id),
        RecordRef::Name(name) => artists::find_artist_id_by_name(&mut *conn, name).await?,
    };
    found.ok_or_else(|| Error::InvalidInput(format!("Unknown artist: {}", describe(reference))))
}

async fn resolve_venue(conn: &mut SqliteConnection, reference: &RecordRef) -> crate::Result<i64> {
    let found = match reference {
        RecordRef::Id(id) => venues::get_venue(&mut *conn, *id).await?.map(|v| v.id),
        RecordRef::Name(name) => venues::find_venue_id_by_name(&mut *conn, name).await?,
    };
    found.ok_or_else(|| Error::InvalidInput(format!("Unknown venue: {}", describe(reference))))
}

fn describe(reference: &RecordRef) -> String {
    match reference {
        RecordRef::Id(id) => format!("#{}", id),
        RecordRef::Name(name) => format!("'{}'", name),
    }
}

/// Rows whose shows are checked before deletion
#[derive(Debug, Clone, Copy)]
enum ShowOwner {
    Venue,
    Artist,
}

async fn delete_with_dependents(
    conn: &mut SqliteConnection,
    owner: ShowOwner,
    id: i64,
    policy: DeletePolicy,
) -> crate::Result<DeleteOutcome> {
    let dependents = match owner {
        ShowOwner::Venue => shows::count_for_venue(conn, id).await?,
        ShowOwner::Artist => shows::count_for_artist(conn, id).await?,
    };

    let shows_removed = match (dependents, policy) {
        (0, _) => 0,
        (n, DeletePolicy::Restrict) => {
            return Err(Error::Conflict(format!(
                "{:?} {} still has {} show(s); delete them first or cascade",
                owner, id, n
            )));
        }
        (_, DeletePolicy::Cascade) => match owner {
            ShowOwner::Venue => shows::delete_for_venue(conn, id).await?,
            ShowOwner::Artist => shows::delete_for_artist(conn, id).await?,
        },
    };

    let removed = match owner {
        ShowOwner::Venue => venues::delete_venue(conn, id).await?,
        ShowOwner::Artist => artists::delete_artist(conn, id).await?,
    };

    Ok(DeleteOutcome {
        deleted: removed > 0,
        shows_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database_with_pool_size;
    use crate::db::test_support::{sample_artist_fields, sample_venue_fields, test_pool};
    use chrono::{Duration, Utc};
    use std::time::Duration as StdDuration;
    use tempfile::TempDir;

    async fn install_failure_trigger(pool: &SqlitePool, table: &str) {
        install_trigger_on(pool, "INSERT", table).await;
    }

    /// Makes every `event` (INSERT, UPDATE or DELETE) on `table` fail
    async fn install_trigger_on(pool: &SqlitePool, event: &str, table: &str) {
        let sql = format!(
            "CREATE TRIGGER fail_{event}_{table} BEFORE {event} ON {table} \
             BEGIN SELECT RAISE(ABORT, 'simulated storage failure'); END"
        );
        sqlx::query(&sql).execute(pool).await.unwrap();
    }

    fn show_fields(artist: RecordRef, venue: RecordRef, image: Option<&str>) -> ShowFields {
        ShowFields {
            artist,
            venue,
            start_time: Utc::now() + Duration::days(30),
            artist_image_link: image.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_venue_visible_after_commit() {
        let (_dir, pool) = test_pool().await;
        let fields = sample_venue_fields("The Musical Hop", "San Francisco", "CA");

        let id = create_venue(&pool, &fields).await.expect("create should succeed");

        assert_eq!(venues::count_venues(&pool).await.unwrap(), 1);
        let stored = venues::get_venue(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.name, "The Musical Hop");
    }

    #[tokio::test]
    async fn test_failed_create_rolls_back_and_releases_connection() {
        let dir = TempDir::new().unwrap();
        // A single connection: a leaked one would block every later query
        let pool = init_database_with_pool_size(&dir.path().join("one.db"), 1)
            .await
            .unwrap();
        install_failure_trigger(&pool, "venues").await;

        let err = create_venue(&pool, &sample_venue_fields("Doomed", "Austin", "TX"))
            .await
            .expect_err("trigger should abort the insert");
        assert!(err.source.is_storage());
        assert_eq!(
            err.flash_message(),
            "An error occurred. Venue Doomed could not be listed."
        );

        let count = tokio::time::timeout(StdDuration::from_secs(5), venues::count_venues(&pool))
            .await
            .expect("connection should have been released")
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_update_missing_venue_is_not_found() {
        let (_dir, pool) = test_pool().await;
        let err = update_venue(&pool, 77, &sample_venue_fields("Ghost", "Austin", "TX"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_artist_overwrites() {
        let (_dir, pool) = test_pool().await;
        let id = create_artist(&pool, &sample_artist_fields("Guns N Petals")).await.unwrap();

        let mut fields = sample_artist_fields("Guns N Roses");
        fields.city = "Los Angeles".to_string();
        update_artist(&pool, id, &fields).await.unwrap();

        let stored = artists::get_artist(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Guns N Roses");
        assert_eq!(stored.city, "Los Angeles");
    }

    #[tokio::test]
    async fn test_delete_missing_venue_is_success() {
        let (_dir, pool) = test_pool().await;
        let outcome = delete_venue(&pool, 12345, DeletePolicy::Restrict).await.unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome {
                deleted: false,
                shows_removed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_delete_with_shows_requires_cascade() {
        let (_dir, pool) = test_pool().await;
        let venue = create_venue(&pool, &sample_venue_fields("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = create_artist(&pool, &sample_artist_fields("Guns N Petals")).await.unwrap();
        create_show(&pool, &show_fields(RecordRef::Id(artist), RecordRef::Id(venue), None))
            .await
            .unwrap();

        let err = delete_venue(&pool, venue, DeletePolicy::Restrict).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(venues::get_venue(&pool, venue).await.unwrap().is_some());
        assert_eq!(shows::count_shows(&pool).await.unwrap(), 1);

        let outcome = delete_venue(&pool, venue, DeletePolicy::Cascade).await.unwrap();
        assert!(outcome.deleted);
        assert_eq!(outcome.shows_removed, 1);
        assert!(venues::get_venue(&pool, venue).await.unwrap().is_none());
        assert_eq!(shows::count_shows(&pool).await.unwrap(), 0);
        assert!(artists::get_artist(&pool, artist).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_show_by_names() {
        let (_dir, pool) = test_pool().await;
        let venue = create_venue(&pool, &sample_venue_fields("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .await
            .unwrap();
        let mut bare = sample_artist_fields("The Wild Sax Band");
        bare.image_link = None;
        let artist = create_artist(&pool, &bare).await.unwrap();

        let fields = show_fields(
            RecordRef::Name("the wild sax band".to_string()),
            RecordRef::Name("Park Square Live Music & Coffee".to_string()),
            Some("https://images.example/sax.jpg"),
        );
        create_show(&pool, &fields).await.unwrap();

        let listed = shows::shows_for_venue(&pool, venue).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].artist_id, artist);
        assert_eq!(listed[0].artist_image_link.as_deref(), Some("https://images.example/sax.jpg"));
    }

    #[tokio::test]
    async fn test_create_show_unknown_artist_is_invalid_input() {
        let (_dir, pool) = test_pool().await;
        let venue = create_venue(&pool, &sample_venue_fields("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let err = create_show(
            &pool,
            &show_fields(RecordRef::Name("Nobody".to_string()), RecordRef::Id(venue), None),
        )
        .await
        .unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(err.flash_message(), "An error occurred. Show could not be listed.");
        assert_eq!(shows::count_shows(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_show_insert_rolls_back_image_fill() {
        let (_dir, pool) = test_pool().await;
        let venue = create_venue(&pool, &sample_venue_fields("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let mut bare = sample_artist_fields("Matt Quevedo");
        bare.image_link = None;
        let artist = create_artist(&pool, &bare).await.unwrap();
        install_failure_trigger(&pool, "shows").await;

        let result = create_show(
            &pool,
            &show_fields(RecordRef::Id(artist), RecordRef::Id(venue), Some("https://images.example/mq.jpg")),
        )
        .await;
        assert!(result.is_err());

        let stored = artists::get_artist(&pool, artist).await.unwrap().unwrap();
        assert_eq!(stored.image_link, None, "image fill must roll back with the insert");
    }

    #[tokio::test]
    async fn test_failed_cascade_delete_keeps_venue_and_shows() {
        let (_dir, pool) = test_pool().await;
        let venue = create_venue(&pool, &sample_venue_fields("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = create_artist(&pool, &sample_artist_fields("Guns N Petals")).await.unwrap();
        create_show(&pool, &show_fields(RecordRef::Id(artist), RecordRef::Id(venue), None))
            .await
            .unwrap();
        // The shows are deleted first, so only the final venue delete fails
        install_trigger_on(&pool, "DELETE", "venues").await;

        let err = delete_venue(&pool, venue, DeletePolicy::Cascade).await.unwrap_err();

        assert!(err.source.is_storage());
        assert_eq!(
            err.flash_message(),
            format!("An error occurred. Venue #{} could not be deleted.", venue)
        );
        assert!(venues::get_venue(&pool, venue).await.unwrap().is_some());
        assert_eq!(shows::count_shows(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_row_and_releases_connection() {
        let dir = TempDir::new().unwrap();
        let pool = init_database_with_pool_size(&dir.path().join("one.db"), 1)
            .await
            .unwrap();
        let original = sample_venue_fields("The Dueling Pianos Bar", "New York", "NY");
        let id = create_venue(&pool, &original).await.unwrap();
        install_trigger_on(&pool, "UPDATE", "venues").await;

        let err = update_venue(&pool, id, &sample_venue_fields("The Dueling Pianos Lounge", "New York", "NY"))
            .await
            .unwrap_err();
        assert!(err.source.is_storage());
        assert_eq!(
            err.flash_message(),
            "An error occurred. Venue The Dueling Pianos Lounge could not be edited."
        );

        let stored = tokio::time::timeout(StdDuration::from_secs(5), venues::get_venue(&pool, id))
            .await
            .expect("connection should have been released")
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "The Dueling Pianos Bar");
    }

    #[test]
    fn test_operation_messages() {
        let op = Operation::new(EntityKind::Artist, Action::Update, "Guns N Petals");
        assert_eq!(op.success_message(), "Artist Guns N Petals was successfully updated!");
        assert_eq!(
            op.failure_message(),
            "An error occurred. Artist Guns N Petals could not be edited."
        );

        let show = Operation::new(EntityKind::Show, Action::Create, "");
        assert_eq!(show.success_message(), "Show was successfully listed!");
    }
}
