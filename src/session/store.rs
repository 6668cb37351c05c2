use super::ConversationSession;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

/// Process-wide session registry, keyed by session id. Each session sits
/// behind its own mutex so one session's operations never interleave while
/// independent sessions proceed concurrently.
///
/// Transcript persistence is opt-in (`storage.persist_transcripts`): when
/// enabled, sessions are written as JSON under `<data_dir>/transcripts/` and
/// reloaded on startup.
pub struct SessionStore {
    transcripts_dir: PathBuf,
    persist: bool,
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<ConversationSession>>>>,
}

impl SessionStore {
    pub async fn new(data_dir: &Path, persist: bool) -> Result<Arc<Self>> {
        let transcripts_dir = data_dir.join("transcripts");
        let mut sessions = HashMap::new();

        if persist {
            fs::create_dir_all(&transcripts_dir)
                .await
                .with_context(|| {
                    format!("Failed to create transcript dir: {}", transcripts_dir.display())
                })?;

            let mut entries = fs::read_dir(&transcripts_dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                match Self::load_session(&path).await {
                    Ok(session) => {
                        sessions.insert(session.id(), Arc::new(Mutex::new(session)));
                    }
                    Err(e) => warn!("Skipping unreadable transcript {}: {}", path.display(), e),
                }
            }
            info!("Restored {} persisted session(s)", sessions.len());
        }

        Ok(Arc::new(Self {
            transcripts_dir,
            persist,
            sessions: RwLock::new(sessions),
        }))
    }

    async fn load_session(path: &Path) -> Result<ConversationSession> {
        let content = fs::read_to_string(path).await?;
        serde_json::from_str(&content).context("Failed to parse transcript file")
    }

    pub async fn create(&self) -> Arc<Mutex<ConversationSession>> {
        let session = ConversationSession::new();
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<ConversationSession>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed && self.persist {
            let path = self.session_path(id);
            if let Err(e) = fs::remove_file(&path).await
                && !matches!(e.kind(), std::io::ErrorKind::NotFound)
            {
                warn!("Failed to remove transcript {}: {}", path.display(), e);
            }
        }
        removed
    }

    /// Writes one session's transcript to disk. No-op unless persistence is
    /// enabled.
    pub async fn save(&self, session: &ConversationSession) -> Result<()> {
        if !self.persist {
            return Ok(());
        }
        let path = self.session_path(session.id());
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write transcript: {}", path.display()))?;
        Ok(())
    }

    pub async fn flush(&self) -> Result<()> {
        if !self.persist {
            return Ok(());
        }
        let sessions = self.sessions.read().await;
        for handle in sessions.values() {
            let session = handle.lock().await;
            self.save(&session).await?;
        }
        Ok(())
    }

    fn session_path(&self, id: Uuid) -> PathBuf {
        self.transcripts_dir.join(format!("{id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_sessions_are_retrievable_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), false).await.unwrap();

        let handle = store.create().await;
        let id = handle.lock().await.id();

        assert!(store.get(id).await.is_some());
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), false).await.unwrap();

        let first = store.create().await;
        let second = store.create().await;

        first.lock().await.append_user_message("hello").unwrap();

        assert_eq!(first.lock().await.transcript().len(), 1);
        assert!(second.lock().await.transcript().is_empty());
    }

    #[tokio::test]
    async fn remove_forgets_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), false).await.unwrap();

        let handle = store.create().await;
        let id = handle.lock().await.id();

        assert!(store.remove(id).await);
        assert!(store.get(id).await.is_none());
        assert!(!store.remove(id).await);
    }

    #[tokio::test]
    async fn persisted_sessions_survive_a_store_restart() {
        let dir = tempfile::tempdir().unwrap();

        let id = {
            let store = SessionStore::new(dir.path(), true).await.unwrap();
            let handle = store.create().await;
            let mut session = handle.lock().await;
            session.append_user_message("what is m20 grade").unwrap();
            let id = session.id();
            drop(session);
            store.flush().await.unwrap();
            id
        };

        let store = SessionStore::new(dir.path(), true).await.unwrap();
        let handle = store.get(id).await.expect("session restored from disk");
        let session = handle.lock().await;
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].content(), "what is m20 grade");
    }

    #[tokio::test]
    async fn save_is_a_no_op_without_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), false).await.unwrap();

        let handle = store.create().await;
        let session = handle.lock().await;
        store.save(&session).await.unwrap();

        assert!(!dir.path().join("transcripts").exists());
    }

    #[tokio::test]
    async fn unreadable_transcript_files_are_skipped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let transcripts = dir.path().join("transcripts");
        std::fs::create_dir_all(&transcripts).unwrap();
        std::fs::write(transcripts.join("garbage.json"), "not json").unwrap();

        let store = SessionStore::new(dir.path(), true).await.unwrap();
        assert!(store.sessions.read().await.is_empty());
    }
}
