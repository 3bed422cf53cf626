//! Orchestrator-level errors: room capacity and lookup failures.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("room {0} is full")]
    RoomFull(String),
    #[error("room {0} does not exist")]
    RoomNotFound(String),
}
