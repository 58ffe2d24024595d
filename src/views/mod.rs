pub mod backtests_view;
pub mod dashboard_view;
pub mod help_view;
pub mod navigation;
pub mod settings_editor;
pub mod settings_form;
pub mod signals_view;
pub mod table_view;
