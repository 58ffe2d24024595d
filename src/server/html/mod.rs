pub mod layout;
pub mod pages;
