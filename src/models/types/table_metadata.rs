use crate::enums::{DataType, SemanticType};
use crate::models::frames::relation::QueryMetadata;

/// Descriptor of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: DataType,
    pub semantic_type: Option<SemanticType>,
}

/// Identity and schema of one logical result table.
///
/// Built once from the table's schema message and never mutated. The table
/// state owns it behind an `Arc`; records and handlers only borrow or share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    pub id: String,
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableMetadata {
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Position of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

impl From<QueryMetadata> for TableMetadata {
    fn from(md: QueryMetadata) -> Self {
        let columns = md
            .relation
            .columns
            .into_iter()
            .map(|c| ColumnInfo {
                name: c.column_name,
                data_type: c.column_type,
                semantic_type: c.column_semantic_type,
            })
            .collect();
        TableMetadata {
            id: md.id,
            name: md.name,
            columns,
        }
    }
}
