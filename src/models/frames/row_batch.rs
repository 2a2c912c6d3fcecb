//! Data message: one batch of rows for one table.

use serde::{Deserialize, Serialize};

use crate::enums::DataType;

/// Homogeneous values of one column, one variant per scalar kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnData {
    BooleanData(Vec<bool>),
    Int64Data(Vec<i64>),
    Float64Data(Vec<f64>),
    StringData(Vec<String>),
    Time64NsData(Vec<i64>),
    Duration64NsData(Vec<i64>),
}

impl ColumnData {
    /// Scalar kind of these values.
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnData::BooleanData(_) => DataType::Boolean,
            ColumnData::Int64Data(_) => DataType::Int64,
            ColumnData::Float64Data(_) => DataType::Float64,
            ColumnData::StringData(_) => DataType::String,
            ColumnData::Time64NsData(_) => DataType::Time64Ns,
            ColumnData::Duration64NsData(_) => DataType::Duration64Ns,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::BooleanData(v) => v.len(),
            ColumnData::Int64Data(v) => v.len(),
            ColumnData::Float64Data(v) => v.len(),
            ColumnData::StringData(v) => v.len(),
            ColumnData::Time64NsData(v) => v.len(),
            ColumnData::Duration64NsData(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One wire column.
///
/// `nulls[i] == true` marks slot `i` as "no data". When present it must be
/// exactly as long as the values; the value stored in a null slot is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub col_data: ColumnData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<Vec<bool>>,
}

impl Column {
    pub fn new(col_data: ColumnData) -> Self {
        Self { col_data, nulls: None }
    }

    pub fn with_nulls(col_data: ColumnData, nulls: Vec<bool>) -> Self {
        Self { col_data, nulls: Some(nulls) }
    }
}

/// A contiguous chunk of rows for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBatchData {
    pub table_id: String,
    #[serde(default)]
    pub cols: Vec<Column>,
    pub num_rows: i64,
    /// Soft window boundary. Informational only.
    #[serde(default)]
    pub eow: bool,
    /// No further batches follow for this table.
    #[serde(default)]
    pub eos: bool,
}
