mod actions;
mod context;
mod history;

pub use actions::{Action, UndoResult};
pub use context::UndoContext;
pub use history::ActionHistory;
