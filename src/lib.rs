pub mod ar;
pub mod card;
pub mod catalog;
pub mod check;
pub mod config;
pub mod error;
pub mod gallery;
pub mod host;
pub mod net;

pub use error::{ArError, Result};
