//! Small shared helpers for model-reply parsing and text handling.

pub mod json_ext;
pub mod text;
