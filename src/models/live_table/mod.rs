pub mod live_table;
pub mod live_table_builder;
pub mod live_table_config;
