pub mod probe;

#[cfg(feature = "gui")]
pub mod thumbnail;
