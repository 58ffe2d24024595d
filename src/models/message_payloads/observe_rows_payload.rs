use crate::models::{message_payloads::rows_changed_payload::RowsChangedPayload, traits::table_row::TableRow};
use actix::{Message, Recipient};

pub struct ObserveRowsPayload<R: TableRow> {
    pub observer: Recipient<RowsChangedPayload<R>>,
}

impl<R: TableRow> Message for ObserveRowsPayload<R> {
    type Result = ();
}
