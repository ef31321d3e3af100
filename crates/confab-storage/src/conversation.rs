//! Conversation log storage - append-only question/answer records.
//!
//! Keys encode `(created_at_ms, sequence)` as zero-padded decimal so redb's
//! key order is chronological order. The append cursor keeps `created_at`
//! monotonically non-decreasing and `sequence` strictly increasing, which
//! makes deletion and listing deterministic even when two appends land in
//! the same millisecond.

use anyhow::{Result, anyhow};
use chrono::Utc;
use parking_lot::Mutex;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const CONVERSATIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("conversations");

/// One stored question/answer exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(default)]
    pub sequence: u64,
}

/// Hands out monotonic (created_at, sequence) pairs for new records
#[derive(Debug, Default)]
struct AppendCursor {
    last_ms: i64,
    next_seq: u64,
}

/// Ordered conversation log backed by a single redb table
pub struct ConversationStorage {
    db: Arc<Database>,
    cursor: Mutex<AppendCursor>,
}

impl ConversationStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(CONVERSATIONS_TABLE)?;
        write_txn.commit()?;

        let cursor = Self::recover_cursor(&db)?;
        Ok(Self {
            db,
            cursor: Mutex::new(cursor),
        })
    }

    /// Rebuild the append cursor from the largest stored key so a reopened
    /// log keeps assigning strictly increasing positions.
    fn recover_cursor(db: &Database) -> Result<AppendCursor> {
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(CONVERSATIONS_TABLE)?;

        let mut iter = table.iter()?.rev();
        let Some(item) = iter.next() else {
            return Ok(AppendCursor::default());
        };
        let (key, _) = item?;
        let (last_ms, last_seq) = parse_record_key(key.value())
            .ok_or_else(|| anyhow!("Malformed conversation key: {}", key.value()))?;

        Ok(AppendCursor {
            last_ms,
            next_seq: last_seq + 1,
        })
    }

    /// Append one exchange with a server-assigned timestamp and sequence.
    pub fn append(&self, question: &str, answer: &str) -> Result<Conversation> {
        let record = {
            let mut cursor = self.cursor.lock();
            let now_ms = Utc::now().timestamp_millis();
            let created_at = now_ms.max(cursor.last_ms);
            let sequence = cursor.next_seq;
            cursor.last_ms = created_at;
            cursor.next_seq += 1;

            Conversation {
                id: Uuid::new_v4().to_string(),
                question: question.to_string(),
                answer: answer.to_string(),
                created_at,
                sequence,
            }
        };

        let key = record_key(record.created_at, record.sequence);
        let serialized = serde_json::to_vec(&record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CONVERSATIONS_TABLE)?;
            table.insert(key.as_str(), serialized.as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!("Appended conversation {} at {}", record.id, key);

        Ok(record)
    }

    /// List every stored record, newest first.
    pub fn list_recent(&self) -> Result<Vec<Conversation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONVERSATIONS_TABLE)?;

        let mut records = Vec::new();
        for item in table.iter()?.rev() {
            let (_, value) = item?;
            let record: Conversation = serde_json::from_slice(value.value())?;
            records.push(record);
        }

        Ok(records)
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONVERSATIONS_TABLE)?;
        Ok(table.len()? as usize)
    }

    /// Delete the `n` oldest records in one transaction.
    ///
    /// Returns the number actually removed. Asking for more records than
    /// exist empties the table without error.
    pub fn delete_oldest(&self, n: usize) -> Result<usize> {
        if n == 0 {
            return Ok(0);
        }

        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(CONVERSATIONS_TABLE)?;

            let keys: Vec<String> = {
                let mut keys = Vec::new();
                for item in table.iter()?.take(n) {
                    let (key, _) = item?;
                    keys.push(key.value().to_string());
                }
                keys
            };

            for key in &keys {
                table.remove(key.as_str())?;
            }
            keys.len()
        };
        write_txn.commit()?;

        tracing::debug!("Deleted {} oldest conversation records", removed);

        Ok(removed)
    }
}

fn record_key(created_at_ms: i64, sequence: u64) -> String {
    let created_at_ms = created_at_ms.max(0) as u64;
    format!("{created_at_ms:020}:{sequence:012}")
}

fn parse_record_key(key: &str) -> Option<(i64, u64)> {
    let (ts, seq) = key.split_once(':')?;
    let ts = ts.parse::<u64>().ok()?;
    let seq = seq.parse::<u64>().ok()?;
    Some((ts.min(i64::MAX as u64) as i64, seq))
}
