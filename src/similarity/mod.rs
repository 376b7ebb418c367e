//! Image similarity: per-pixel error, reduction to a mean, and painting comparison.

pub(crate) mod metric;
pub(crate) mod reduce;
pub(crate) mod scorer;
