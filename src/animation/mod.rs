//! Time-based animation: task variants and the frame-driven scheduler.

pub mod scheduler;
pub mod task;

pub use scheduler::{AnimationScheduler, CompletedTask};
pub use task::{AnimationTask, Completion, FLIP_HALF_TURN, TaskKind, TaskStatus};
