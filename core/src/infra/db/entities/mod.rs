//! SeaORM entities backing the metadata store

pub mod file_entry;
pub mod file_tag;
pub mod operation;
pub mod recent_item;
pub mod setting;
pub mod tag;
pub mod workspace;
