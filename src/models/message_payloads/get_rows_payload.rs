use crate::models::{message_payloads::rows_changed_payload::RowsChangedPayload, traits::table_row::TableRow};
use actix::Message;
use std::marker::PhantomData;

pub struct GetRowsPayload<R: TableRow> {
    _row: PhantomData<R>,
}

impl<R: TableRow> GetRowsPayload<R> {
    pub fn new() -> Self {
        Self { _row: PhantomData }
    }
}

impl<R: TableRow> Message for GetRowsPayload<R> {
    type Result = RowsChangedPayload<R>;
}
