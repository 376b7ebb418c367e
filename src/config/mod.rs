//! JSON settings for paintings, tools, compositing, comparison and scoring.

pub(crate) mod settings;
