//! Engine error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by engine operations
#[derive(Error, Debug)]
pub enum CoreError {
	/// The store or workspace context is not yet available
	#[error("engine is not initialized: {0}")]
	NotInitialized(&'static str),

	/// Caller supplied malformed input
	#[error("invalid request: {0}")]
	InvalidRequest(String),

	/// A referenced row does not exist
	#[error("{0} not found")]
	NotFound(&'static str),

	/// A uniqueness, check or foreign key constraint was violated
	#[error("constraint violation: {0}")]
	ConstraintViolation(String),

	/// A rename or move would clobber an existing on-disk entry
	#[error("target already exists: {0}")]
	TargetExists(PathBuf),

	/// The organize plan contains unresolved conflicts
	#[error("plan contains {0} unresolved conflict(s)")]
	ConflictInPlan(usize),

	/// A file moved between preview and execution
	#[error("plan is stale: {0} changed since preview")]
	PlanStale(String),

	/// Undo was attempted against the wrong active workspace
	#[error("operation belongs to a different workspace")]
	WorkspaceMismatch,

	/// Filesystem or database I/O failure, including busy-timeout
	/// exhaustion and unreadable documents
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// The operation was cancelled by its caller
	#[error("operation cancelled")]
	Cancelled,
}

impl From<sea_orm::DbErr> for CoreError {
	fn from(err: sea_orm::DbErr) -> Self {
		use sea_orm::SqlErr;
		match err.sql_err() {
			Some(SqlErr::UniqueConstraintViolation(msg)) => CoreError::ConstraintViolation(msg),
			Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
				CoreError::ConstraintViolation(msg)
			}
			_ => match err {
				sea_orm::DbErr::RecordNotFound(_) => CoreError::NotFound("record"),
				other => CoreError::Io(std::io::Error::other(other)),
			},
		}
	}
}

impl From<serde_json::Error> for CoreError {
	fn from(err: serde_json::Error) -> Self {
		CoreError::Io(std::io::Error::other(err))
	}
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, CoreError>;
