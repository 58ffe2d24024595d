pub mod channel_forwarder;
pub mod dashboard_server;
pub mod html;
pub mod live_socket;
pub mod settings_socket;
