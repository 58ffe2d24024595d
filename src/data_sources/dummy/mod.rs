pub mod dummy_backend;
pub mod dummy_feed;
