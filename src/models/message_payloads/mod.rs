pub mod edit_settings_payload;
pub mod get_rows_payload;
pub mod get_settings_payload;
pub mod observe_rows_payload;
pub mod observe_settings_payload;
pub mod reconfigure_payload;
pub mod rows_changed_payload;
pub mod save_settings_payload;
pub mod settings_changed_payload;
pub mod stop_payload;
