use std::fmt;
use std::sync::Arc;

use camino::Utf8Path;

/// Which of the two input files a slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotId {
    First,
    Second,
}

impl SlotId {
    pub const ALL: [SlotId; 2] = [SlotId::First, SlotId::Second];

    pub fn label(self) -> &'static str {
        match self {
            SlotId::First => "first",
            SlotId::Second => "second",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a slot: `Idle → Discovering → Ready | Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SlotStatus {
    #[default]
    Idle,
    Discovering,
    Ready,
    Failed,
}

/// An uploaded tabular file: display name plus raw bytes.
///
/// Contents are shared, so cloning a `TableFile` for a request is cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct TableFile {
    name: String,
    contents: Arc<[u8]>,
}

impl TableFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk. The file name (without directories) becomes the display name.
    pub async fn open(path: &Utf8Path) -> std::io::Result<Self> {
        let contents = tokio::fs::read(path).await?;
        let name = path.file_name().unwrap_or(path.as_str()).to_string();
        Ok(Self::new(name, contents))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl fmt::Debug for TableFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableFile")
            .field("name", &self.name)
            .field("bytes", &self.contents.len())
            .finish()
    }
}

/// What happened when a discovery response was applied to a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    Ready,
    Failed,
    /// The slot was reselected after the request was issued; response ignored.
    Stale,
}

/// One of the two input files and its discovered columns.
///
/// Invariant: `columns` is non-empty iff `status == Ready`. The `generation`
/// counter increases on every selection, so a late discovery response for a
/// previously selected file can be recognised and dropped.
#[derive(Clone, Debug, Default)]
pub struct FileSlot {
    file: Option<TableFile>,
    columns: Vec<String>,
    status: SlotStatus,
    error: Option<String>,
    generation: u64,
}

impl FileSlot {
    pub fn file(&self) -> Option<&TableFile> {
        self.file.as_ref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ready(&self) -> bool {
        self.status == SlotStatus::Ready
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Replace the slot with a newly selected file and enter `Discovering`.
    ///
    /// Columns are cleared immediately so no stale options are offered while
    /// the new discovery call is outstanding. Returns the generation the
    /// eventual response must carry.
    pub fn select(&mut self, file: TableFile) -> u64 {
        self.generation += 1;
        self.file = Some(file);
        self.columns.clear();
        self.error = None;
        self.status = SlotStatus::Discovering;
        self.generation
    }

    /// Apply a successful discovery response.
    ///
    /// An empty column list is treated as a failure.
    pub fn apply_columns(&mut self, generation: u64, columns: Vec<String>) -> DiscoveryOutcome {
        if generation != self.generation || self.status != SlotStatus::Discovering {
            return DiscoveryOutcome::Stale;
        }
        if columns.is_empty() {
            return self.apply_failure(generation, "No columns found in file".to_string());
        }
        self.columns = columns;
        self.error = None;
        self.status = SlotStatus::Ready;
        DiscoveryOutcome::Ready
    }

    /// Return to `Idle` with no file. The generation counter is kept so
    /// responses issued before the clear still count as stale.
    pub fn clear(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Apply a failed discovery response. No partial column data is retained.
    pub fn apply_failure(&mut self, generation: u64, message: String) -> DiscoveryOutcome {
        if generation != self.generation || self.status != SlotStatus::Discovering {
            return DiscoveryOutcome::Stale;
        }
        self.columns.clear();
        self.error = Some(message);
        self.status = SlotStatus::Failed;
        DiscoveryOutcome::Failed
    }
}
