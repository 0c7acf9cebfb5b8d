//! # gtdust
//!
//! A terminal task manager built on the Getting Things Done flow: tasks
//! land in the inbox, get sorted into today / anytime / someday or a
//! scheduled date, are grouped under projects, areas and tags, and end up
//! in the logbook or the trash.
//!
//! * [`models`]: tasks, projects, areas, tags and the persisted state.
//! * [`store`]: the only writer of that state.
//! * [`views`]: pure derivation of the task list shown for each view.
//! * [`storage`]: the JSON slot the state is mirrored to after every change.

pub mod commands;
pub mod error;
pub mod logging;
pub mod models;
pub mod palette;
pub mod storage;
pub mod store;
pub mod tui;
pub mod views;

pub use error::StorageError;
pub use models::{AppState, Task, TaskStatus, ViewType};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use store::Store;
