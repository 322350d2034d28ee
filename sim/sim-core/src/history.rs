//! Recorded snapshots and their tabular export.

use std::io::{self, Write};

use hashbrown::HashMap;
use sim_types::BoatState;

/// Append-only record of completed steps.
///
/// Each snapshot is the state after its generators ran and its accelerations
/// were solved, before it was advanced.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<BoatState>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, snapshot: BoatState) {
        self.snapshots.push(snapshot);
    }

    /// Number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot of step `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BoatState> {
        self.snapshots.get(index)
    }

    /// Most recent snapshot.
    #[must_use]
    pub fn last(&self) -> Option<&BoatState> {
        self.snapshots.last()
    }

    /// Snapshot before the most recent one.
    #[must_use]
    pub fn previous(&self) -> Option<&BoatState> {
        self.len().checked_sub(2).and_then(|i| self.get(i))
    }

    /// Snapshots in step order.
    pub fn iter(&self) -> std::slice::Iter<'_, BoatState> {
        self.snapshots.iter()
    }

    /// All snapshots.
    #[must_use]
    pub fn as_slice(&self) -> &[BoatState] {
        &self.snapshots
    }

    /// Flatten every snapshot into named columns.
    ///
    /// Columns appear in the order they are first seen; a snapshot lacking a
    /// column gets `NaN` there.
    #[must_use]
    pub fn to_table(&self) -> HistoryTable {
        let flats: Vec<_> = self.snapshots.iter().map(BoatState::to_labels).collect();

        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for flat in &flats {
            for key in flat.keys() {
                if !index.contains_key(key) {
                    index.insert(key.to_string(), columns.len());
                    columns.push(key.to_string());
                }
            }
        }

        let rows = flats
            .iter()
            .map(|flat| {
                let mut row = vec![f64::NAN; columns.len()];
                for (key, value) in flat.iter() {
                    if let Some(&i) = index.get(key) {
                        row[i] = value;
                    }
                }
                row
            })
            .collect();

        HistoryTable { columns, rows }
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a BoatState;
    type IntoIter = std::slice::Iter<'a, BoatState>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Named columns with one row per snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryTable {
    /// Column names.
    pub columns: Vec<String>,
    /// Values, one row per snapshot, aligned with `columns`.
    pub rows: Vec<Vec<f64>>,
}

impl HistoryTable {
    /// Position of a column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of a column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let i = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[i]).collect())
    }

    /// Write a header row and one row per snapshot.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_delimited<W: Write>(&self, mut writer: W, delimiter: char) -> io::Result<()> {
        let mut buf = [0; 4];
        let sep: &str = delimiter.encode_utf8(&mut buf);

        writeln!(writer, "{}", self.columns.join(sep))?;
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(f64::to_string).collect();
            writeln!(writer, "{}", line.join(sep))?;
        }
        writer.flush()
    }
}
