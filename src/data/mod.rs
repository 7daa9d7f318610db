//! Data acquisition: the COVID Tracking Project client and the background
//! fetch worker used by the TUI.

pub mod covid;
pub mod worker;

pub use covid::CovidClient;
pub use worker::{FetchResponse, spawn_fetch};
