//! File export

pub mod obj;
