//! Infrastructure: the embedded metadata store

pub mod db;
