//! Tabular data component with per-column coupling attributes.
//!
//! Each column is both a producer and a consumer attribute addressing the
//! current row. In iteration mode the table advances one row per update,
//! wrapping at the end, which turns a table into a looping stimulus
//! source.
//!
//! Consumer writes do not land in the table immediately: they are staged
//! and applied to the current row only when the round completes, so a row
//! of inputs arriving over several couplings is committed atomically.

use std::any::Any;

use indexmap::IndexMap;

use weft_archive::codec;
use weft_archive::{ArchiveError, ComponentLoadError};
use weft_core::{
    AttributeError, CouplingContainer, SaveError, Value, ValueType, WorkspaceComponent,
};

/// Named columns by rows of `f64`, exposed one row at a time.
pub struct DataTable {
    name: String,
    columns: Vec<String>,
    /// Row-major cell data; every row has `columns.len()` cells.
    rows: Vec<Vec<f64>>,
    current_row: usize,
    iterate: bool,
    staged: IndexMap<String, f64>,
    attributes: CouplingContainer,
    dirty: bool,
}

impl DataTable {
    /// A table of zeros with the given columns and row count.
    pub fn new(name: impl Into<String>, columns: &[&str], row_count: usize) -> Self {
        let mut attributes = CouplingContainer::new();
        for column in columns {
            attributes.add_producer(*column, ValueType::Float);
            attributes.add_consumer(*column, ValueType::Float);
        }
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: vec![vec![0.0; columns.len()]; row_count],
            current_row: 0,
            iterate: false,
            staged: IndexMap::new(),
            attributes,
            dirty: true,
        }
    }

    /// Enable or disable row iteration. When enabled, each update advances
    /// the current row, wrapping past the last row.
    pub fn set_iterate(&mut self, iterate: bool) {
        self.iterate = iterate;
        self.dirty = true;
    }

    /// The row the attributes currently address.
    pub fn current_row(&self) -> usize {
        self.current_row
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell value, if in range.
    pub fn get(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col])
    }

    /// Set a cell value. Returns `false` if out of range.
    pub fn set(&mut self, row: usize, column: &str, value: f64) -> bool {
        let Some(col) = self.column_index(column) else {
            return false;
        };
        match self.rows.get_mut(row) {
            Some(r) => {
                r[col] = value;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Add a column of zeros. Registers a producer and a consumer
    /// attribute under the column name; couplings may target it from the
    /// next creation onwards. Returns `false` if the name is taken.
    pub fn add_column(&mut self, column: &str) -> bool {
        if self.column_index(column).is_some() {
            return false;
        }
        self.columns.push(column.to_string());
        for row in &mut self.rows {
            row.push(0.0);
        }
        self.attributes.add_producer(column, ValueType::Float);
        self.attributes.add_consumer(column, ValueType::Float);
        self.dirty = true;
        true
    }

    /// Remove a column and its attributes. Couplings targeting the
    /// removed attribute are skipped at the next resolve, and detached by
    /// the workspace when their component closes.
    pub fn remove_column(&mut self, column: &str) -> bool {
        let Some(col) = self.column_index(column) else {
            return false;
        };
        self.columns.remove(col);
        for row in &mut self.rows {
            row.remove(col);
        }
        self.attributes.remove_producer(column);
        self.attributes.remove_consumer(column);
        self.staged.shift_remove(column);
        self.dirty = true;
        true
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Rebuild a table from its archive payload.
    pub fn open(payload: &[u8]) -> Result<Box<dyn WorkspaceComponent>, ComponentLoadError> {
        let mut r = payload;
        Self::decode(&mut r).map_err(ComponentLoadError::new)
    }

    fn decode(r: &mut &[u8]) -> Result<Box<dyn WorkspaceComponent>, ArchiveError> {
        let name = codec::read_length_prefixed_str(r)?;
        let iterate = codec::read_bool(r)?;
        let current_row = codec::read_u64_le(r)? as usize;
        let column_count = codec::read_u32_le(r)? as usize;
        let mut columns = Vec::with_capacity(column_count);
        for _ in 0..column_count {
            columns.push(codec::read_length_prefixed_str(r)?);
        }
        let row_count = codec::read_u64_le(r)? as usize;
        let mut rows = Vec::with_capacity(row_count);
        for _ in 0..row_count {
            let mut row = Vec::with_capacity(column_count);
            for _ in 0..column_count {
                row.push(codec::read_f64_le(r)?);
            }
            rows.push(row);
        }
        if current_row >= row_count && row_count > 0 {
            return Err(ArchiveError::Malformed {
                detail: format!("current row {current_row} out of {row_count} rows"),
            });
        }

        let borrowed: Vec<&str> = columns.iter().map(String::as_str).collect();
        let mut table = DataTable::new(name, &borrowed, 0);
        table.rows = rows;
        table.current_row = current_row;
        table.iterate = iterate;
        table.dirty = false;
        Ok(Box::new(table))
    }
}

impl WorkspaceComponent for DataTable {
    fn type_tag(&self) -> &'static str {
        "data_table"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &CouplingContainer {
        &self.attributes
    }

    fn produce(&self, attribute: &str) -> Result<Value, AttributeError> {
        let col = self
            .column_index(attribute)
            .ok_or_else(|| AttributeError::UnknownAttribute {
                attribute: attribute.to_string(),
            })?;
        let row = self
            .rows
            .get(self.current_row)
            .ok_or_else(|| AttributeError::Failed {
                reason: "table has no rows".to_string(),
            })?;
        Ok(Value::Float(row[col]))
    }

    fn consume(&mut self, attribute: &str, value: Value) -> Result<(), AttributeError> {
        if self.column_index(attribute).is_none() {
            return Err(AttributeError::UnknownAttribute {
                attribute: attribute.to_string(),
            });
        }
        match value {
            Value::Float(v) => {
                self.staged.insert(attribute.to_string(), v);
                Ok(())
            }
            other => Err(AttributeError::TypeMismatch {
                expected: ValueType::Float,
                got: other.value_type(),
            }),
        }
    }

    fn update(&mut self) {
        if self.iterate && !self.rows.is_empty() {
            self.current_row = (self.current_row + 1) % self.rows.len();
        }
    }

    fn round_completed(&mut self) {
        if self.staged.is_empty() {
            return;
        }
        let staged = std::mem::take(&mut self.staged);
        if let Some(row) = self.rows.get_mut(self.current_row) {
            for (column, value) in staged {
                if let Some(col) = self.columns.iter().position(|c| *c == column) {
                    row[col] = value;
                }
            }
            self.dirty = true;
        }
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn save(&self) -> Result<Vec<u8>, SaveError> {
        let mut buf = Vec::new();
        let encode = |buf: &mut Vec<u8>| -> Result<(), ArchiveError> {
            codec::write_length_prefixed_str(buf, &self.name)?;
            codec::write_bool(buf, self.iterate)?;
            codec::write_u64_le(buf, self.current_row as u64)?;
            codec::write_u32_le(buf, self.columns.len() as u32)?;
            for column in &self.columns {
                codec::write_length_prefixed_str(buf, column)?;
            }
            codec::write_u64_le(buf, self.rows.len() as u64)?;
            for row in &self.rows {
                for cell in row {
                    codec::write_f64_le(buf, *cell)?;
                }
            }
            Ok(())
        };
        encode(&mut buf).map_err(|e| SaveError::Encode {
            detail: e.to_string(),
        })?;
        Ok(buf)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
