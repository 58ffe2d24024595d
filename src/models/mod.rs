pub mod agent;
pub mod change_kind;
pub mod dashboard_error;
pub mod fx_source;
pub mod live_table;
pub mod message_payloads;
pub mod query;
pub mod row_event;
pub mod rows;
pub mod side;
pub mod traits;
