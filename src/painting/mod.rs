//! Painting history: line geometry and the append-only stroke/tape log.

pub(crate) mod history;
pub(crate) mod segment;
