//! Packing a painting into fixed-capacity records and composing it into a raster target.

pub(crate) mod canvas;
pub(crate) mod footprint;
pub(crate) mod packing;
pub(crate) mod pass;
pub(crate) mod target;
