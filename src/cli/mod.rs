pub mod check;
pub mod options;
pub mod prompt;
pub mod setup;
pub mod ui;
