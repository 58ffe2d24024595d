use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// A row type that can be read from a backend table and held by a live table.
pub trait TableRow: DeserializeOwned + Serialize + Clone + Debug + Send + Unpin + 'static {
    const TABLE: &'static str;
    /// Default select list, PostgREST syntax.
    const COLUMNS: &'static str;
    const ORDER_COLUMN: &'static str;
}
