use crate::models::live_table::live_table_config::LiveTableConfig;
use actix::Message;

/// Replaces a live table's parameters; the table tears down and re-activates.
#[derive(Debug, Clone)]
pub struct ReconfigurePayload {
    pub config: LiveTableConfig,
}

impl Message for ReconfigurePayload {
    type Result = ();
}
