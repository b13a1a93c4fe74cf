use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::log;
use crate::storage::{
    ConfigSerializer, ContentProvider, FileContentProvider, InMemoryContentProvider,
    YamlConfigSerializer,
};
use super::{ScoreReport, ScoreReporter};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    #[serde(default)]
    pub high_score: u32,
    /// RFC 3339 local time of the run that set `high_score`.
    #[serde(default)]
    pub achieved_at: Option<String>,
}

/// Keeps the best score in a single YAML document.
pub struct HighScoreStore<TContentProvider, TSerializer = YamlConfigSerializer>
where
    TContentProvider: ContentProvider + 'static,
    TSerializer: ConfigSerializer<HighScoreRecord> + Send + Sync + 'static,
{
    content_provider: Arc<TContentProvider>,
    serializer: Arc<TSerializer>,
    write_lock: Arc<Mutex<()>>,
}

impl<TContentProvider, TSerializer> Clone for HighScoreStore<TContentProvider, TSerializer>
where
    TContentProvider: ContentProvider + 'static,
    TSerializer: ConfigSerializer<HighScoreRecord> + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            content_provider: Arc::clone(&self.content_provider),
            serializer: Arc::clone(&self.serializer),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl HighScoreStore<FileContentProvider> {
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentProvider::new(file_path), YamlConfigSerializer::new())
    }
}

impl HighScoreStore<InMemoryContentProvider> {
    pub fn in_memory() -> Self {
        Self::new(InMemoryContentProvider::new(), YamlConfigSerializer::new())
    }
}

impl<TContentProvider, TSerializer> HighScoreStore<TContentProvider, TSerializer>
where
    TContentProvider: ContentProvider + 'static,
    TSerializer: ConfigSerializer<HighScoreRecord> + Send + Sync + 'static,
{
    pub fn new(content_provider: TContentProvider, serializer: TSerializer) -> Self {
        Self {
            content_provider: Arc::new(content_provider),
            serializer: Arc::new(serializer),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Stored record; nothing stored yet reads as a zero high score.
    pub fn load(&self) -> Result<HighScoreRecord, String> {
        match self.content_provider.get_content()? {
            Some(content) => self.serializer.deserialize(&content),
            None => Ok(HighScoreRecord::default()),
        }
    }

    /// Compares `final_score` with the stored best and writes it when higher.
    pub fn record(&self, final_score: u32) -> Result<ScoreReport, String> {
        let stored = self.load()?;
        if final_score <= stored.high_score {
            return Ok(ScoreReport {
                is_new_high_score: false,
                stored_high_score: stored.high_score,
            });
        }

        let record = HighScoreRecord {
            high_score: final_score,
            achieved_at: Some(Local::now().to_rfc3339()),
        };
        let content = self.serializer.serialize(&record)?;
        self.content_provider.set_content(&content)?;
        log!("High score raised from {} to {}", stored.high_score, final_score);

        Ok(ScoreReport {
            is_new_high_score: true,
            stored_high_score: final_score,
        })
    }
}

impl<TContentProvider, TSerializer> ScoreReporter for HighScoreStore<TContentProvider, TSerializer>
where
    TContentProvider: ContentProvider + 'static,
    TSerializer: ConfigSerializer<HighScoreRecord> + Send + Sync + 'static,
{
    async fn report_score(&self, final_score: u32) -> Result<ScoreReport, String> {
        // Serializes read-compare-write between concurrent reports.
        let _guard = self.write_lock.lock().await;
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.record(final_score))
            .await
            .map_err(|e| format!("High score task failed: {}", e))?
    }
}
