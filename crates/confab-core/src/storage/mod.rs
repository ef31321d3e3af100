use anyhow::Result;
use redb::Database;
use std::sync::Arc;

pub use confab_storage::{Conversation, ConversationStorage};

/// Typed storage handles opened over a single redb database.
pub struct Storage {
    pub conversations: ConversationStorage,
}

impl Storage {
    pub fn new(db_path: &str) -> Result<Self> {
        let db = Arc::new(Database::create(db_path)?);
        let conversations = ConversationStorage::new(db)?;

        Ok(Self { conversations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_append() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = Storage::new(db_path.to_str().unwrap()).unwrap();

        storage.conversations.append("q", "a").unwrap();
        assert_eq!(storage.conversations.count().unwrap(), 1);
    }
}
