//! Schema message: announces one result table.

use serde::{Deserialize, Serialize};

use crate::enums::{DataType, SemanticType};

/// Wire descriptor for one column of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationColumn {
    pub column_name: String,
    pub column_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_semantic_type: Option<SemanticType>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub column_desc: String,
}

/// Ordered column layout of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Relation {
    pub columns: Vec<RelationColumn>,
}

/// Table announcement: name, opaque identifier and relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMetadata {
    pub name: String,
    pub id: String,
    pub relation: Relation,
}
