// --- Constants for the result stream ---

pub const STATUS_OK: i32 = 0; // top-level status code for success
pub const STATUS_CANCELLED: i32 = 1; // reported by the server when a query is cancelled

pub const DEFAULT_TABLE_CAPACITY: usize = 8; // initial size of the table-id map
pub const DEFAULT_UNIQUE_TABLE_NAMES: bool = true;
