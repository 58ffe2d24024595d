use crate::models::traits::table_row::TableRow;
use actix::Message;

/// Current state of a live table, pushed to observers after every change.
#[derive(Debug, Clone)]
pub struct RowsChangedPayload<R: TableRow> {
    pub rows: Vec<R>,
    pub error: Option<String>,
    /// True until the initial query has resolved.
    pub loading: bool,
}

impl<R: TableRow> Message for RowsChangedPayload<R> {
    type Result = ();
}
