//! liftlog - Weekly weight training planner and workout log
//!
//! Plan exercises per weekday, stage today's session from the plan,
//! fill it in from the browser and archive it into history.

pub mod db;
pub mod error;
pub mod exercises;
pub mod history;
pub mod schedule;
pub mod web;
pub mod workout;

pub use db::Database;
