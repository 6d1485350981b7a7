//! qrdrop state library
//!
//! The in-memory authority for upload hand-offs. Tokens and images live only for
//! the lifetime of the process; there is no persistence and no coordination
//! between processes.

pub mod db;

pub use db::{
    spawn_session_reaper, HandoffStore, ImageRegistry, StoreCounts, SubmitCheck, TokenStore,
};
