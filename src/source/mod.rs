//! Data-source collaborators feeding the realtime engine.
//!
//! A source produces the complete current [`Table`] on every `update`, never
//! a delta. The engine only reads tables, so rows are never removed.

mod memory;
mod text_reader;

pub use memory::{MemoryFeed, MemorySource};
pub use text_reader::{FieldFormat, TextReader};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Table;
use crate::error::ScopeResult;

/// Free-form reader options, passed through unmodified.
pub type SourceOptions = IndexMap<String, serde_json::Value>;

/// Contract for anything the engine can sample.
pub trait DataSource: Send {
    /// Performs the initial read and returns the dataset so far.
    fn init(&mut self) -> ScopeResult<Table>;

    /// Returns the full current dataset.
    fn update(&mut self) -> ScopeResult<Table>;

    fn close(&mut self) -> ScopeResult<()> {
        Ok(())
    }
}

pub type BoxedDataSource = Box<dyn DataSource>;

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn init(&mut self) -> ScopeResult<Table> {
        (**self).init()
    }

    fn update(&mut self) -> ScopeResult<Table> {
        (**self).update()
    }

    fn close(&mut self) -> ScopeResult<()> {
        (**self).close()
    }
}

/// Built-in reader selection used when no custom factory is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderKind {
    #[default]
    Text,
    Hex,
}

/// Opens `source` with the built-in reader selected by `kind`.
pub fn open_source(
    kind: ReaderKind,
    source: &str,
    options: &SourceOptions,
) -> ScopeResult<BoxedDataSource> {
    let format = match kind {
        ReaderKind::Text => FieldFormat::Decimal,
        ReaderKind::Hex => FieldFormat::Hex,
    };
    Ok(Box::new(TextReader::open(source, format, options)?))
}
