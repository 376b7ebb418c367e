//! Round scoring: the point policy and background scoring jobs.

pub(crate) mod pending;
pub(crate) mod policy;
