use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use rusqlite::{params, Connection};
use tokio::sync::oneshot;

mod migrations;

use crate::models::Record;
use migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct RecordStoreInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for RecordStoreInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to record store thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join record store thread: {join_err:?}");
            }
        }
    }
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| anyhow!("invalid datetime '{value}': {err}"))
}

/// Append-only store for finalized stopwatch records. A dedicated worker
/// thread owns the SQLite connection; callers hand it closures over an mpsc
/// channel and await the reply, so the connection never crosses threads.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<RecordStoreInner>,
    db_path: Arc<PathBuf>,
}

impl RecordStore {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("lapnote-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite database")));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }

                let init_result =
                    run_migrations(&mut conn).context("failed to run database migrations");
                if ready_tx.send(init_result).is_err() {
                    error!("Record store initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => {
                            task(&mut conn);
                        }
                        DbCommand::Shutdown => break,
                    }
                }

                info!("Record store thread shutting down");
            })
            .with_context(|| "failed to spawn record store worker thread")?;

        ready_rx
            .recv()
            .context("record store worker exited before signaling readiness")??;

        info!("Record store initialized at {}", db_path.as_path().display());

        Ok(Self {
            inner: Arc::new(RecordStoreInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("Record store caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to record store thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("record store thread terminated unexpectedly"))?
    }

    pub async fn insert_record(&self, record: &Record) -> Result<()> {
        let record = record.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO records (id, duration, note, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.id,
                    record.duration,
                    record.note,
                    record.created_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert record")?;
            Ok(())
        })
        .await
    }

    /// All records in insertion order, oldest first.
    pub async fn list_records(&self) -> Result<Vec<Record>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, duration, note, created_at
                 FROM records
                 ORDER BY rowid ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(Record {
                    id: row.get(0)?,
                    duration: row.get(1)?,
                    note: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?)?,
                });
            }

            Ok(records)
        })
        .await
    }
}
