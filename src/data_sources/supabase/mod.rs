pub mod rest_api;
pub mod supabase_client;
pub mod supabase_config;
pub mod ws;
