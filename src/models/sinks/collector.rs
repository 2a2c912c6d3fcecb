//! # Table Collector
//!
//! A ready-made [`TableMuxer`] that buffers every accepted table's records in
//! memory. Useful for small scripts and for tests; large or unbounded results
//! should use a streaming handler instead.
//!
//! The collector hands out a [`CollectedTables`] handle before the stream is
//! consumed. The handle stays readable after the demultiplexer is dropped.
//!
//! Storage is keyed by table identifier. Several tables may share a name (a
//! name can be reused once the earlier table finished); name lookups combine
//! them in the order they were opened.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::HandlerError;
use crate::models::types::record::Record;
use crate::models::types::table_metadata::TableMetadata;
use crate::traits::table_handler::TableRecordHandler;
use crate::traits::table_muxer::{BoxedTableHandler, TableMuxer};

/// Everything received for one table.
#[derive(Debug, Clone)]
pub struct CollectedTable {
    pub metadata: TableMetadata,
    pub records: Vec<Record>,
    /// Set once the table's end-of-stream batch has been delivered.
    pub done: bool,
}

#[derive(Debug, Default)]
struct Store {
    by_id: HashMap<String, CollectedTable>,
    /// Table identifiers in the order they were opened.
    order: Vec<String>,
}

impl Store {
    fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CollectedTable> + 'a {
        self.order
            .iter()
            .filter_map(move |id| self.by_id.get(id))
            .filter(move |t| t.metadata.name == name)
    }
}

type Shared = Arc<Mutex<Store>>;

/// Read handle over the tables gathered by a [`TableCollector`].
#[derive(Debug, Clone, Default)]
pub struct CollectedTables {
    inner: Shared,
}

impl CollectedTables {
    /// The table with identifier `table_id`.
    pub fn get(&self, table_id: &str) -> Option<CollectedTable> {
        self.inner.lock().by_id.get(table_id).cloned()
    }

    /// Identifiers of the tables called `name`, in opening order.
    pub fn ids(&self, name: &str) -> Vec<String> {
        self.inner
            .lock()
            .named(name)
            .map(|t| t.metadata.id.clone())
            .collect()
    }

    /// Records of every table called `name`, in opening order. Empty if the
    /// name was never seen.
    pub fn records(&self, name: &str) -> Vec<Record> {
        self.inner
            .lock()
            .named(name)
            .flat_map(|t| t.records.iter().cloned())
            .collect()
    }

    /// True when at least one table is called `name` and all of them finished.
    pub fn is_done(&self, name: &str) -> bool {
        let store = self.inner.lock();
        let mut tables = store.named(name).peekable();
        tables.peek().is_some() && tables.all(|t| t.done)
    }

    /// Sorted, distinct table names.
    pub fn names(&self) -> Vec<String> {
        let store = self.inner.lock();
        let names: BTreeSet<&String> = store.by_id.values().map(|t| &t.metadata.name).collect();
        names.into_iter().cloned().collect()
    }

    /// Number of tables collected, counting each identifier once.
    pub fn len(&self) -> usize {
        self.inner.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Muxer that accepts tables (optionally only some, by name) and stores their rows.
#[derive(Debug, Clone, Default)]
pub struct TableCollector {
    tables: CollectedTables,
    only: Option<BTreeSet<String>>,
}

impl TableCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept only the named tables. Any other table is declined, which
    /// terminates the stream.
    pub fn only<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn tables(&self) -> CollectedTables {
        self.tables.clone()
    }
}

impl TableMuxer for TableCollector {
    fn accept_table(
        &mut self,
        metadata: &TableMetadata,
    ) -> Result<Option<BoxedTableHandler>, HandlerError> {
        if let Some(only) = &self.only {
            if !only.contains(&metadata.name) {
                return Ok(None);
            }
        }
        Ok(Some(Box::new(CollectingHandler {
            id: metadata.id.clone(),
            tables: self.tables.inner.clone(),
        })))
    }
}

struct CollectingHandler {
    id: String,
    tables: Shared,
}

impl TableRecordHandler for CollectingHandler {
    fn handle_init(&mut self, metadata: &TableMetadata) -> Result<(), HandlerError> {
        let mut store = self.tables.lock();
        if store.by_id.contains_key(&self.id) {
            return Err(format!("table id '{}' was already collected", self.id).into());
        }
        store.by_id.insert(
            self.id.clone(),
            CollectedTable {
                metadata: metadata.clone(),
                records: Vec::new(),
                done: false,
            },
        );
        store.order.push(self.id.clone());
        Ok(())
    }

    fn handle_record(&mut self, record: Record) -> Result<(), HandlerError> {
        match self.tables.lock().by_id.get_mut(&self.id) {
            Some(table) => {
                table.records.push(record);
                Ok(())
            }
            None => Err(format!("table id '{}' was not initialised", self.id).into()),
        }
    }

    fn handle_done(&mut self) -> Result<(), HandlerError> {
        if let Some(table) = self.tables.lock().by_id.get_mut(&self.id) {
            table.done = true;
        }
        Ok(())
    }
}
