use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::{self, queries, SharedConnection};
use crate::services::menu::MenuViewModel;
use crate::services::remote::{FetchError, MenuSource};

pub const LAST_SYNCED_KEY: &str = "menuLastSyncedAt";

#[derive(Debug)]
pub enum SyncOutcome {
    /// The fetched payload is now the visible dish list and new names were
    /// written to the local store.
    Remote { fetched: usize, inserted: usize },
    /// The fetch succeeded and is displayed, but the local store could not be
    /// updated.
    RemoteUncached { fetched: usize, reason: anyhow::Error },
    /// The fetch failed; whatever the local read produced stays visible.
    KeptLocal { reason: FetchError },
}

#[derive(Debug)]
pub struct SyncReport {
    pub local_rows: usize,
    pub outcome: SyncOutcome,
    pub finished_at: DateTime<Utc>,
}

/// Serializable summary of the last [`SyncReport`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SyncStatus {
    pub outcome: &'static str,
    pub local_rows: usize,
    pub fetched: Option<usize>,
    pub inserted: Option<usize>,
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn status(&self) -> SyncStatus {
        let (outcome, fetched, inserted, error) = match &self.outcome {
            SyncOutcome::Remote { fetched, inserted } => {
                ("remote", Some(*fetched), Some(*inserted), None)
            }
            SyncOutcome::RemoteUncached { fetched, reason } => {
                ("remote_uncached", Some(*fetched), None, Some(format!("{reason:#}")))
            }
            SyncOutcome::KeptLocal { reason } => ("kept_local", None, None, Some(reason.to_string())),
        };
        SyncStatus {
            outcome,
            local_rows: self.local_rows,
            fetched,
            inserted,
            error,
            finished_at: self.finished_at,
        }
    }
}

/// Reconciles the local menu store with the remote source. Local rows are
/// shown first; a successful fetch always supersedes them.
pub struct MenuSynchronizer {
    db: SharedConnection,
    source: Arc<dyn MenuSource>,
}

impl MenuSynchronizer {
    pub fn new(db: SharedConnection, source: Arc<dyn MenuSource>) -> Self {
        Self { db, source }
    }

    /// Publishes the stored rows when there are any. A read failure counts as
    /// an empty store.
    pub fn load_local(&self, menu: &MenuViewModel) -> usize {
        let rows = {
            let conn = db::lock(&self.db);
            queries::get_all_dishes(&conn)
        };

        match rows {
            Ok(dishes) if !dishes.is_empty() => {
                let count = dishes.len();
                menu.set_dishes(dishes);
                count
            }
            Ok(_) => 0,
            Err(e) => {
                tracing::warn!("failed to read local menu, continuing without it: {e:#}");
                0
            }
        }
    }

    pub async fn run(&self, menu: &MenuViewModel) -> SyncReport {
        let local_rows = self.load_local(menu);
        tracing::info!("loaded {local_rows} dishes from local store");

        let outcome = match self.source.fetch_menu().await {
            Ok(dishes) => {
                let fetched = dishes.len();
                let merged = {
                    let mut conn = db::lock(&self.db);
                    let merged = queries::merge_dishes(&mut conn, &dishes);
                    // The rows are cached by now; a missing timestamp only
                    // affects status reporting.
                    if merged.is_ok() {
                        if let Err(e) =
                            queries::set_value(&conn, LAST_SYNCED_KEY, &Utc::now().to_rfc3339())
                        {
                            tracing::warn!("failed to record menu sync time: {e:#}");
                        }
                    }
                    merged
                };
                menu.set_dishes(dishes);

                match merged {
                    Ok(merge) => {
                        tracing::info!(
                            "menu synced: {fetched} fetched, {} new, {} already stored",
                            merge.inserted,
                            merge.skipped
                        );
                        SyncOutcome::Remote {
                            fetched,
                            inserted: merge.inserted,
                        }
                    }
                    Err(reason) => {
                        tracing::error!("failed to cache fetched menu: {reason:#}");
                        SyncOutcome::RemoteUncached { fetched, reason }
                    }
                }
            }
            Err(reason) => {
                tracing::warn!("menu fetch failed, keeping local data: {reason}");
                SyncOutcome::KeptLocal { reason }
            }
        };

        let report = SyncReport {
            local_rows,
            outcome,
            finished_at: Utc::now(),
        };
        menu.record_sync(report.status());
        report
    }
}

pub fn last_synced_at(db: &SharedConnection) -> Option<DateTime<Utc>> {
    let conn = db::lock(db);
    match queries::get_value(&conn, LAST_SYNCED_KEY) {
        Ok(value) => value
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("failed to read last sync time: {e:#}");
            None
        }
    }
}
