//! This crate holds the core logic of a gamified task manager.
//!
//! The centerpiece is the calendar view machinery: [`grid`] builds the fixed 42-cell month
//! grid a calendar page renders, and [`index`] groups tasks by their due day and selects the
//! upcoming ones. Both are pure, ephemeral derivations over a task list: they are recomputed
//! on every render and never cached or mutated in place.
//!
//! Around that core:
//! * [`task`] is the task data model, with the lenient decoding the backend's wire data needs
//! * [`filter`] holds the derived task-list and dashboard views
//! * [`stats`] mirrors the backend's XP/level/streak formulas so views can render progress
//! * [`client`] talks to the REST backend (tasks, gamification, external calendar sync),
//!   behind the [`traits::TaskSource`] seam
//! * [`session`] is the explicit session context (token, profile, theme) with a file backing

pub mod task;
pub use task::{Priority, Task, TaskId, TaskStatus};
pub mod grid;
pub use grid::{CalendarCell, GridMonth, MonthGrid, Today};
pub mod index;
pub use index::{DateIndex, DateKey};
pub mod filter;
pub mod stats;
pub mod session;
pub use session::Session;
pub mod traits;
pub mod client;
pub use client::Client;

pub mod utils;
