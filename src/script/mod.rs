//! Recorded input-layer calls, replayed into a painting by the CLI.

pub(crate) mod replay;
