use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Source of a single text document. `Ok(None)` means "nothing stored yet".
pub trait ContentProvider: Send + Sync {
    fn get_content(&self) -> Result<Option<String>, String>;
    fn set_content(&self, content: &str) -> Result<(), String>;
}

#[derive(Clone, Debug)]
pub struct FileContentProvider {
    file_path: PathBuf,
}

impl FileContentProvider {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl ContentProvider for FileContentProvider {
    fn get_content(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(&self.file_path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!(
                "Failed to read {}: {}",
                self.file_path.display(),
                err
            )),
        }
    }

    fn set_content(&self, content: &str) -> Result<(), String> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                format!("Failed to create directory {}: {}", parent.display(), e)
            })?;
        }
        std::fs::write(&self.file_path, content)
            .map_err(|e| format!("Failed to write {}: {}", self.file_path.display(), e))
    }
}

/// Keeps the document in memory; clones share the same document.
#[derive(Clone, Debug, Default)]
pub struct InMemoryContentProvider {
    content: Arc<Mutex<Option<String>>>,
    fail_writes: bool,
}

impl InMemoryContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: &str) -> Self {
        Self {
            content: Arc::new(Mutex::new(Some(content.to_string()))),
            fail_writes: false,
        }
    }

    /// A provider whose writes always fail, for exercising error paths.
    pub fn read_only() -> Self {
        Self {
            content: Arc::new(Mutex::new(None)),
            fail_writes: true,
        }
    }
}

impl ContentProvider for InMemoryContentProvider {
    fn get_content(&self) -> Result<Option<String>, String> {
        let content = self
            .content
            .lock()
            .map_err(|_| "In-memory content lock poisoned".to_string())?;
        Ok(content.clone())
    }

    fn set_content(&self, content: &str) -> Result<(), String> {
        if self.fail_writes {
            return Err("In-memory content is read-only".to_string());
        }
        let mut current = self
            .content
            .lock()
            .map_err(|_| "In-memory content lock poisoned".to_string())?;
        *current = Some(content.to_string());
        Ok(())
    }
}
