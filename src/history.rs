//! Append-only command history with whole-file persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, ShellError};

/// Load/save collaborator for the history log.
pub trait HistoryStore {
    fn load(&self) -> Result<Vec<String>>;
    /// Replaces the persisted log with `entries`.
    fn save(&self, entries: &[String]) -> Result<()>;
}

/// One entry per line; every save rewrites the file.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(ShellError::path(&self.path, e)),
        }
    }

    fn save(&self, entries: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ShellError::path(parent, e))?;
        }
        fs::write(&self.path, entries.join("\n")).map_err(|e| ShellError::path(&self.path, e))
    }
}

pub struct HistoryLog {
    entries: Vec<String>,
    store: Box<dyn HistoryStore>,
}

impl HistoryLog {
    pub fn load(store: Box<dyn HistoryStore>) -> Result<Self> {
        let entries = store.load()?;
        debug!(count = entries.len(), "loaded history");
        Ok(Self { entries, store })
    }

    /// Appends `line` in memory, then flushes the whole log.
    ///
    /// The in-memory entry is kept even if the flush fails.
    pub fn record(&mut self, line: &str) -> Result<()> {
        self.entries.push(line.to_string());
        self.store.save(&self.entries)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Default)]
    pub struct MemoryHistoryStore {
        pub saved: Rc<RefCell<Vec<String>>>,
    }

    impl HistoryStore for MemoryHistoryStore {
        fn load(&self) -> Result<Vec<String>> {
            Ok(self.saved.borrow().clone())
        }

        fn save(&self, entries: &[String]) -> Result<()> {
            *self.saved.borrow_mut() = entries.to_vec();
            Ok(())
        }
    }
}
