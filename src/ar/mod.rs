//! AR activation pipeline
//!
//! - `platform` — origin / user agent, Android vs iOS vs other
//! - `resolve`  — primary URL, USDZ alternate, Scene Viewer intent
//! - `viewer`   — the embedded viewer capability
//! - `modal`    — viewer lifecycle and the "activate AR" action

pub mod modal;
pub mod platform;
pub mod resolve;
pub mod viewer;
