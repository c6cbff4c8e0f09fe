//! UI layer for the console: app shell, navigation menu, tables, and form windows.

pub mod app;
pub mod forms;
pub mod menu;
pub mod tables;

pub use app::ConsoleApp;
