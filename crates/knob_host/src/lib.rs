pub mod config;
pub mod events;
pub mod gui;
pub mod logging;
pub mod sys;
