//! Opaque-blob persistence.
//!
//! Reminders, alarms, and the tag vocabulary are stored as JSON blobs under
//! fixed keys in a single key-value table. The store never interprets blob
//! contents beyond (de)serializing whole collections; read-modify-write
//! mutations run inside one closure on the worker thread so they are atomic
//! with respect to the trigger loop's snapshot reads.

use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use log::{error, info, warn};
use rusqlite::{params, Connection};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::oneshot;

use crate::models::{initial_tags, Alarm, Reminder, Tag};

const REMINDERS_KEY: &str = "vault_reminders_v1";
const ALARMS_KEY: &str = "vault_alarms_v1";
const TAGS_KEY: &str = "vault_tags_v1";

type VaultTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum VaultCommand {
    Execute(VaultTask),
    Shutdown,
}

struct VaultInner {
    sender: mpsc::Sender<VaultCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for VaultInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(VaultCommand::Shutdown) {
                error!("Failed to send shutdown to vault thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join vault thread: {join_err:?}");
            }
        }
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS vault (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create vault table")?;
    Ok(())
}

fn read_blob(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM vault WHERE key = ?1")?;
    let mut rows = stmt.query(params![key])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row.get::<_, String>(0)?))
    } else {
        Ok(None)
    }
}

fn write_blob(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO vault (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Utc::now().to_rfc3339()],
    )
    .with_context(|| format!("failed to write vault key {key}"))?;
    Ok(())
}

fn read_collection<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Vec<T>> {
    match read_blob(conn, key)? {
        None => Ok(Vec::new()),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                // Corrupt data must not take the loop down; it reads as empty.
                warn!("vault key {key} holds corrupt JSON ({err}); treating as empty");
                Ok(Vec::new())
            }
        },
    }
}

fn write_collection<T: Serialize>(conn: &Connection, key: &str, items: &[T]) -> Result<()> {
    let raw = serde_json::to_string(items)
        .with_context(|| format!("failed to serialize collection for vault key {key}"))?;
    write_blob(conn, key, &raw)
}

#[derive(Clone)]
pub struct Vault {
    inner: Arc<VaultInner>,
    db_path: Arc<PathBuf>,
}

impl Vault {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create vault directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<VaultCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("remindr-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite vault")));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }

                let init_result = init_schema(&conn).context("failed to initialize vault schema");
                if ready_tx.send(init_result).is_err() {
                    error!("Vault initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        VaultCommand::Execute(task) => {
                            task(&mut conn);
                        }
                        VaultCommand::Shutdown => break,
                    }
                }

                info!("Vault thread shutting down");
            })
            .with_context(|| "failed to spawn vault worker thread")?;

        ready_rx
            .recv()
            .context("vault worker exited before signaling readiness")??;

        info!("Vault initialized at {}", db_path.as_path().display());

        Ok(Self {
            inner: Arc::new(VaultInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = VaultCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("Vault caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to vault thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("vault thread terminated unexpectedly"))?
    }

    /// Raw surface: fetch an opaque blob.
    pub async fn get_blob(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.execute(move |conn| read_blob(conn, &key)).await
    }

    /// Raw surface: store an opaque blob.
    pub async fn put_blob(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.execute(move |conn| write_blob(conn, &key, &value)).await
    }

    pub async fn get_reminders(&self) -> Result<Vec<Reminder>> {
        self.execute(|conn| read_collection(conn, REMINDERS_KEY)).await
    }

    pub async fn save_reminders(&self, reminders: Vec<Reminder>) -> Result<()> {
        self.execute(move |conn| write_collection(conn, REMINDERS_KEY, &reminders))
            .await
    }

    /// Newest reminders sit first, matching the input form's prepend.
    pub async fn add_reminder(&self, reminder: Reminder) -> Result<()> {
        self.execute(move |conn| {
            let mut reminders: Vec<Reminder> = read_collection(conn, REMINDERS_KEY)?;
            reminders.insert(0, reminder);
            write_collection(conn, REMINDERS_KEY, &reminders)
        })
        .await
    }

    /// Flip completion state. Returns whether the id was found.
    pub async fn toggle_reminder(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut reminders: Vec<Reminder> = read_collection(conn, REMINDERS_KEY)?;
            let mut found = false;
            for reminder in reminders.iter_mut() {
                if reminder.id == id {
                    reminder.is_completed = !reminder.is_completed;
                    found = true;
                }
            }
            if found {
                write_collection(conn, REMINDERS_KEY, &reminders)?;
            }
            Ok(found)
        })
        .await
    }

    pub async fn delete_reminder(&self, id: &str) -> Result<()> {
        self.delete_reminders(&[id.to_string()]).await
    }

    /// Remove every reminder whose id is in `ids` (the expiry sweep's batch).
    pub async fn delete_reminders(&self, ids: &[String]) -> Result<()> {
        let ids = ids.to_vec();
        self.execute(move |conn| {
            let mut reminders: Vec<Reminder> = read_collection(conn, REMINDERS_KEY)?;
            let before = reminders.len();
            reminders.retain(|r| !ids.contains(&r.id));
            if reminders.len() != before {
                write_collection(conn, REMINDERS_KEY, &reminders)?;
            }
            Ok(())
        })
        .await
    }

    pub async fn get_alarms(&self) -> Result<Vec<Alarm>> {
        self.execute(|conn| read_collection(conn, ALARMS_KEY)).await
    }

    pub async fn save_alarms(&self, alarms: Vec<Alarm>) -> Result<()> {
        self.execute(move |conn| write_collection(conn, ALARMS_KEY, &alarms))
            .await
    }

    pub async fn add_alarm(&self, alarm: Alarm) -> Result<()> {
        self.execute(move |conn| {
            let mut alarms: Vec<Alarm> = read_collection(conn, ALARMS_KEY)?;
            alarms.push(alarm);
            write_collection(conn, ALARMS_KEY, &alarms)
        })
        .await
    }

    pub async fn toggle_alarm(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut alarms: Vec<Alarm> = read_collection(conn, ALARMS_KEY)?;
            let mut found = false;
            for alarm in alarms.iter_mut() {
                if alarm.id == id {
                    alarm.is_enabled = !alarm.is_enabled;
                    found = true;
                }
            }
            if found {
                write_collection(conn, ALARMS_KEY, &alarms)?;
            }
            Ok(found)
        })
        .await
    }

    pub async fn delete_alarm(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut alarms: Vec<Alarm> = read_collection(conn, ALARMS_KEY)?;
            alarms.retain(|a| a.id != id);
            write_collection(conn, ALARMS_KEY, &alarms)
        })
        .await
    }

    /// Known tag vocabulary; a fresh vault answers with the seed set.
    pub async fn get_tags(&self) -> Result<Vec<Tag>> {
        self.execute(|conn| match read_blob(conn, TAGS_KEY)? {
            None => Ok(initial_tags()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(tags) => Ok(tags),
                Err(err) => {
                    warn!("vault key {TAGS_KEY} holds corrupt JSON ({err}); using seed tags");
                    Ok(initial_tags())
                }
            },
        })
        .await
    }

    pub async fn save_tags(&self, tags: Vec<Tag>) -> Result<()> {
        self.execute(move |conn| write_collection(conn, TAGS_KEY, &tags))
            .await
    }
}
