pub mod incoming_message;
pub mod outgoing_message;
pub mod realtime_ws_api;
