//! Terminal front end: one-shot commands and the interactive session

pub mod commands;
pub mod display;
pub mod session;
