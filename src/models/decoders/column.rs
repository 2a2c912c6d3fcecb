//! Wire column → Minarrow array decoder.
//!
//! Checks each wire column's scalar kind against the schema-declared kind and
//! materialises it as a Minarrow array with an Arrow-style validity mask
//! (1 = valid, 0 = null). Decoding is a pure function of its inputs.

use std::sync::Arc;

use minarrow::ffi::arrow_dtype::ArrowType;
use minarrow::{
    Array, Bitmask, BooleanArray, Field, FieldArray, FloatArray, IntegerArray, NumericArray,
    StringArray, TextArray, Vec64,
};

use crate::enums::DataType;
use crate::error::{Result, ResultsError};
use crate::models::frames::row_batch::{Column, ColumnData};
use crate::models::types::record::Datum;
use crate::models::types::table_metadata::{ColumnInfo, TableMetadata};

/// A decoded column, one variant per scalar kind.
///
/// Time and duration share the integer representation; the variant keeps
/// their meaning.
#[derive(Debug, Clone)]
pub enum DecodedColumn {
    Boolean(BooleanArray<()>),
    Int64(IntegerArray<i64>),
    Float64(FloatArray<f64>),
    String(StringArray<u32>),
    Time64Ns(IntegerArray<i64>),
    Duration64Ns(IntegerArray<i64>),
}

#[inline]
fn is_null(mask: Option<&Bitmask>, row: usize) -> bool {
    match mask {
        Some(m) => !m.get(row),
        None => false,
    }
}

impl DecodedColumn {
    pub fn data_type(&self) -> DataType {
        match self {
            DecodedColumn::Boolean(_) => DataType::Boolean,
            DecodedColumn::Int64(_) => DataType::Int64,
            DecodedColumn::Float64(_) => DataType::Float64,
            DecodedColumn::String(_) => DataType::String,
            DecodedColumn::Time64Ns(_) => DataType::Time64Ns,
            DecodedColumn::Duration64Ns(_) => DataType::Duration64Ns,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DecodedColumn::Boolean(a) => a.len(),
            DecodedColumn::Int64(a) | DecodedColumn::Time64Ns(a) | DecodedColumn::Duration64Ns(a) => {
                a.data.as_ref().len()
            }
            DecodedColumn::Float64(a) => a.data.as_ref().len(),
            DecodedColumn::String(a) => a.offsets.as_ref().len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row`. The caller guarantees `row < self.len()`.
    pub fn datum(&self, row: usize) -> Datum {
        match self {
            DecodedColumn::Boolean(a) => {
                if is_null(a.null_mask.as_ref(), row) {
                    Datum::Null(DataType::Boolean)
                } else {
                    Datum::Boolean(a.data.get(row))
                }
            }
            DecodedColumn::Int64(a) => {
                if is_null(a.null_mask.as_ref(), row) {
                    Datum::Null(DataType::Int64)
                } else {
                    Datum::Int64(a.data.as_ref()[row])
                }
            }
            DecodedColumn::Float64(a) => {
                if is_null(a.null_mask.as_ref(), row) {
                    Datum::Null(DataType::Float64)
                } else {
                    Datum::Float64(a.data.as_ref()[row])
                }
            }
            DecodedColumn::String(a) => {
                if is_null(a.null_mask.as_ref(), row) {
                    return Datum::Null(DataType::String);
                }
                let offsets = a.offsets.as_ref();
                let start = offsets[row] as usize;
                let end = offsets[row + 1] as usize;
                Datum::String(String::from_utf8_lossy(&a.data.as_ref()[start..end]).into_owned())
            }
            DecodedColumn::Time64Ns(a) => {
                if is_null(a.null_mask.as_ref(), row) {
                    Datum::Null(DataType::Time64Ns)
                } else {
                    Datum::Time64Ns(a.data.as_ref()[row])
                }
            }
            DecodedColumn::Duration64Ns(a) => {
                if is_null(a.null_mask.as_ref(), row) {
                    Datum::Null(DataType::Duration64Ns)
                } else {
                    Datum::Duration64Ns(a.data.as_ref()[row])
                }
            }
        }
    }

    /// Wraps the column as a Minarrow `FieldArray` named after `info`.
    pub fn to_field_array(&self, info: &ColumnInfo) -> FieldArray {
        let (dtype, array) = match self {
            DecodedColumn::Boolean(a) => (ArrowType::Boolean, Array::BooleanArray(Arc::new(a.clone()))),
            DecodedColumn::Int64(a) | DecodedColumn::Time64Ns(a) | DecodedColumn::Duration64Ns(a) => (
                ArrowType::Int64,
                Array::NumericArray(NumericArray::Int64(Arc::new(a.clone()))),
            ),
            DecodedColumn::Float64(a) => (
                ArrowType::Float64,
                Array::NumericArray(NumericArray::Float64(Arc::new(a.clone()))),
            ),
            DecodedColumn::String(a) => (
                ArrowType::String,
                Array::TextArray(TextArray::String32(Arc::new(a.clone()))),
            ),
        };
        FieldArray::new(
            Field {
                name: info.name.clone(),
                dtype,
                nullable: true,
                metadata: Default::default(),
            },
            array,
        )
    }
}

/// Builds the validity mask for a wire column, or `None` when every slot is valid.
fn validity_mask(
    table: &TableMetadata,
    info: &ColumnInfo,
    nulls: Option<&[bool]>,
    len: usize,
) -> Result<Option<Bitmask>> {
    let Some(nulls) = nulls else {
        return Ok(None);
    };
    if nulls.len() != len {
        return Err(ResultsError::RowCountMismatch {
            table: table.name.clone(),
            detail: format!("null indicators of column '{}'", info.name),
            expected: len,
            actual: nulls.len(),
        });
    }
    if !nulls.iter().any(|&n| n) {
        return Ok(None);
    }
    let valid: Vec<bool> = nulls.iter().map(|&n| !n).collect();
    Ok(Some(Bitmask::from_bools(&valid)))
}

/// Decodes wire column `index` of `table`, checking its kind against the schema.
pub fn decode_column(table: &TableMetadata, index: usize, column: &Column) -> Result<DecodedColumn> {
    let Some(info) = table.columns.get(index) else {
        return Err(ResultsError::RowCountMismatch {
            table: table.name.clone(),
            detail: "column count".to_string(),
            expected: table.num_columns(),
            actual: index + 1,
        });
    };
    let actual = column.col_data.data_type();
    if actual != info.data_type {
        return Err(ResultsError::ColumnTypeMismatch {
            table: table.name.clone(),
            column: info.name.clone(),
            index,
            expected: info.data_type,
            actual,
        });
    }

    let mask = validity_mask(table, info, column.nulls.as_deref(), column.col_data.len())?;

    let decoded = match &column.col_data {
        ColumnData::BooleanData(v) => {
            DecodedColumn::Boolean(BooleanArray::new(Bitmask::from_bools(v), mask))
        }
        ColumnData::Int64Data(v) => {
            DecodedColumn::Int64(IntegerArray::from_vec64(Vec64::from_slice(v), mask))
        }
        ColumnData::Float64Data(v) => {
            DecodedColumn::Float64(FloatArray::from_vec64(Vec64::from_slice(v), mask))
        }
        ColumnData::StringData(v) => {
            let refs: Vec<&str> = v.iter().map(String::as_str).collect();
            DecodedColumn::String(StringArray::<u32>::from_vec(refs, mask))
        }
        ColumnData::Time64NsData(v) => {
            DecodedColumn::Time64Ns(IntegerArray::from_vec64(Vec64::from_slice(v), mask))
        }
        ColumnData::Duration64NsData(v) => {
            DecodedColumn::Duration64Ns(IntegerArray::from_vec64(Vec64::from_slice(v), mask))
        }
    };
    Ok(decoded)
}
