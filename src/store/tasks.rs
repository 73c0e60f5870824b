use std::sync::{Arc, Mutex};

use anyhow::Result;
use uuid::Uuid;

use crate::models::{NewTask, Task};

/// The kanban board that exported tasks are handed to.
///
/// The planner only ever bulk-creates tasks; how the board persists or syncs
/// them is its own business.
pub trait TaskStore: Send + Sync {
    /// Create all tasks, returning them with their assigned ids in input order.
    fn bulk_create(&self, tasks: Vec<NewTask>) -> Result<Vec<Task>>;

    fn list(&self) -> Result<Vec<Task>>;
}

/// In-memory board, used by the local server and in tests.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clone for MemoryTaskStore {
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
        }
    }
}

impl TaskStore for MemoryTaskStore {
    fn bulk_create(&self, tasks: Vec<NewTask>) -> Result<Vec<Task>> {
        let created: Vec<Task> = tasks
            .into_iter()
            .map(|task| Task {
                id: Uuid::new_v4(),
                task,
            })
            .collect();

        let mut board = self.tasks.lock().expect("task store lock poisoned");
        board.extend(created.iter().cloned());
        Ok(created)
    }

    fn list(&self) -> Result<Vec<Task>> {
        let board = self.tasks.lock().expect("task store lock poisoned");
        Ok(board.clone())
    }
}
