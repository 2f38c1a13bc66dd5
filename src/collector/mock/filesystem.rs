//! In-memory mock filesystem for testing calculators without real `/proc`.
//!
//! Besides static files, `MockFs` can hold a sequence of contents for one
//! path: each read pops the next entry, and the last entry sticks. This lets
//! a test script the `last` and `current` samples of a two-point calculator.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Per-path queue of contents handed out one read at a time.
    sequences: Arc<Mutex<HashMap<PathBuf, VecDeque<String>>>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content, replacing any sequence at `path`.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        if let Ok(mut sequences) = self.sequences.lock() {
            sequences.remove(&path);
        }
        self.files.insert(path, content.into());
    }

    /// Adds a file whose content changes on every read.
    ///
    /// The first read returns the first entry, the second read the second
    /// entry and so on; once only one entry is left it is returned forever.
    pub fn add_file_sequence<I, S>(&mut self, path: impl AsRef<Path>, contents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.as_ref().to_path_buf();
        let queue: VecDeque<String> = contents.into_iter().map(Into::into).collect();
        self.files.remove(&path);
        if let Ok(mut sequences) = self.sequences.lock() {
            sequences.insert(path, queue);
        }
    }

    /// Removes a file, so that later reads fail with `NotFound`.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.files.remove(path);
        if let Ok(mut sequences) = self.sequences.lock() {
            sequences.remove(path);
        }
    }

    fn next_in_sequence(&self, path: &Path) -> Option<String> {
        let mut sequences = self.sequences.lock().ok()?;
        let queue = sequences.get_mut(path)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if let Some(content) = self.next_in_sequence(path) {
            return Ok(content);
        }
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }
}
