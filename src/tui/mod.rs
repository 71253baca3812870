//! Interactive terminal front end. A thin host over [`crate::session::Session`]:
//! key presses become [`crate::strategy::Decision`]s queued in a
//! [`crate::agents::HumanAgent`], and the shared round state machine does the rest.

pub mod app;
pub mod controller;
pub mod logger;
mod ui;
