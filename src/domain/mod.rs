//! Domain types: students, selection history, the spin draw, and the
//! storage trait they are persisted through.

pub mod history;
pub mod memory;
pub mod selection;
pub mod statistics;
pub mod store;
pub mod student;

pub use history::{HistoryEntry, MAX_HISTORY_LIMIT, NewHistoryEntry, clamp_history_limit};
pub use memory::InMemoryStore;
pub use selection::SelectionMode;
pub use statistics::RosterStats;
pub use store::RosterStore;
pub use student::{NewStudent, STATUS_PRESENT, Student, is_present_status};
