pub mod constants;
pub mod formatting;
pub mod serde_helpers;

#[cfg(test)]
pub mod test_helpers;
