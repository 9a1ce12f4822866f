use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::Table;
use crate::error::{ScopeError, ScopeResult};

use super::{DataSource, SourceOptions};

/// Encoding of each whitespace-separated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Decimal,
    /// Hexadecimal integers, optionally `0x`-prefixed.
    Hex,
}

impl FieldFormat {
    fn parse(self, field: &str) -> Option<f64> {
        match self {
            Self::Decimal => field.parse::<f64>().ok(),
            Self::Hex => {
                let digits = field
                    .strip_prefix("0x")
                    .or_else(|| field.strip_prefix("0X"))
                    .unwrap_or(field);
                u64::from_str_radix(digits, 16).ok().map(|value| value as f64)
            }
        }
    }
}

/// Tails a growing text file of numeric rows.
///
/// Lines starting with `#` are `key: value` header metadata; a `columns`
/// entry such as `# columns: [locked, adc]` names the columns. Without one,
/// columns are named `col0..colN` from the first row's width. Each read only
/// consumes complete lines appended since the previous read.
#[derive(Debug)]
pub struct TextReader {
    path: PathBuf,
    format: FieldFormat,
    column_override: Option<Vec<String>>,
    header: IndexMap<String, String>,
    table: Table,
    offset: u64,
    line_number: usize,
}

impl TextReader {
    pub fn open(
        path: impl AsRef<Path>,
        format: FieldFormat,
        options: &SourceOptions,
    ) -> ScopeResult<Self> {
        let column_override = match options.get("columns") {
            None => None,
            Some(serde_json::Value::Array(values)) => Some(
                values
                    .iter()
                    .map(|value| match value {
                        serde_json::Value::String(name) => Ok(name.clone()),
                        other => Err(ScopeError::Configuration(format!(
                            "column names must be strings, got `{other}`"
                        ))),
                    })
                    .collect::<ScopeResult<Vec<_>>>()?,
            ),
            Some(other) => {
                return Err(ScopeError::Configuration(format!(
                    "`columns` option must be an array of names, got `{other}`"
                )));
            }
        };

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            format,
            column_override,
            header: IndexMap::new(),
            table: Table::default(),
            offset: 0,
            line_number: 0,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header metadata collected so far, `columns` included.
    #[must_use]
    pub fn header(&self) -> &IndexMap<String, String> {
        &self.header
    }

    fn read_appended(&mut self) -> ScopeResult<()> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if len < self.offset {
            return Err(ScopeError::DataSource(format!(
                "`{}` shrank from {} to {len} bytes",
                self.path.display(),
                self.offset
            )));
        }
        file.seek(SeekFrom::Start(self.offset))?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        // A trailing line without its newline is still being written.
        let Some(last_newline) = buffer.iter().rposition(|&byte| byte == b'\n') else {
            return Ok(());
        };
        let complete = &buffer[..=last_newline];
        let text = std::str::from_utf8(complete).map_err(|err| {
            ScopeError::DataSource(format!("`{}` is not valid utf-8: {err}", self.path.display()))
        })?;

        let mut chunk = PendingChunk {
            width: self.table.column_count(),
            ..PendingChunk::default()
        };
        let mut line_number = self.line_number;
        for line in text.lines() {
            line_number += 1;
            self.stage_line(&mut chunk, line, line_number)?;
        }

        let new_rows = chunk.rows.len();
        self.commit(chunk)?;
        self.line_number = line_number;
        self.offset += complete.len() as u64;
        trace!(
            path = %self.path.display(),
            new_rows,
            total_rows = self.table.row_count(),
            "read appended rows"
        );
        Ok(())
    }

    fn stage_line(
        &self,
        chunk: &mut PendingChunk,
        line: &str,
        line_number: usize,
    ) -> ScopeResult<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some((key, value)) = comment.split_once(':') {
                let key = key.trim().to_owned();
                let value = value.trim().to_owned();
                if key == "columns" && chunk.width == 0 {
                    chunk.start_table(Table::with_columns(parse_column_list(&value))?);
                }
                chunk.header.push((key, value));
            }
            return Ok(());
        }

        let row = line
            .split_whitespace()
            .map(|field| {
                self.format.parse(field).ok_or_else(|| {
                    ScopeError::DataSource(format!(
                        "{}:{line_number}: invalid field `{field}`",
                        self.path.display()
                    ))
                })
            })
            .collect::<ScopeResult<Vec<f64>>>()?;

        if chunk.width == 0 {
            let names = match &self.column_override {
                Some(names) => names.clone(),
                None => (0..row.len()).map(|index| format!("col{index}")).collect(),
            };
            chunk.start_table(Table::with_columns(names)?);
        }
        if row.len() != chunk.width {
            return Err(ScopeError::DataSource(format!(
                "{}:{line_number}: row has {} fields, table has {} columns",
                self.path.display(),
                row.len(),
                chunk.width
            )));
        }
        chunk.rows.push(row);
        Ok(())
    }

    fn commit(&mut self, chunk: PendingChunk) -> ScopeResult<()> {
        self.header.extend(chunk.header);
        if let Some(table) = chunk.table {
            self.table = table;
        }
        for row in &chunk.rows {
            self.table.push_row(row)?;
        }
        Ok(())
    }
}

/// Lines parsed from one read. Nothing reaches the reader until every line
/// of the chunk has parsed, so a failed read can be retried as is.
#[derive(Debug, Default)]
struct PendingChunk {
    header: Vec<(String, String)>,
    /// Replacement for a reader table that had no columns yet.
    table: Option<Table>,
    rows: Vec<Vec<f64>>,
    width: usize,
}

impl PendingChunk {
    fn start_table(&mut self, table: Table) {
        self.width = table.column_count();
        self.table = Some(table);
    }
}

impl DataSource for TextReader {
    fn init(&mut self) -> ScopeResult<Table> {
        self.header.clear();
        self.table = match &self.column_override {
            Some(names) => Table::with_columns(names.clone())?,
            None => Table::default(),
        };
        self.offset = 0;
        self.line_number = 0;
        self.read_appended()?;
        debug!(
            path = %self.path.display(),
            columns = self.table.column_count(),
            rows = self.table.row_count(),
            "text reader initialized"
        );
        Ok(self.table.clone())
    }

    fn update(&mut self) -> ScopeResult<Table> {
        self.read_appended()?;
        Ok(self.table.clone())
    }
}

fn parse_column_list(value: &str) -> Vec<String> {
    value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '\'' || c == '"').to_owned())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_list_accepts_quoted_and_bare_names() {
        assert_eq!(
            parse_column_list("[locked, 'adc', \"aux\"]"),
            vec!["locked", "adc", "aux"]
        );
        assert!(parse_column_list("[]").is_empty());
    }

    #[test]
    fn hex_fields_accept_optional_prefix() {
        assert_eq!(FieldFormat::Hex.parse("ff"), Some(255.0));
        assert_eq!(FieldFormat::Hex.parse("0x10"), Some(16.0));
        assert_eq!(FieldFormat::Hex.parse("zz"), None);
    }
}
