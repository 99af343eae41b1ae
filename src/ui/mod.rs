//! Terminal interaction for the command line front end.
//!
//! - [`display`]: outcome messages
//! - [`progress`]: progress bar driven by the engine
//! - [`prompt`]: masked password input

pub mod display;
pub mod progress;
pub mod prompt;
