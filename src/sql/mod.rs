//! Parameterized SQL sent to the CartoDB SQL API.
//!
//! CartoDB has no bound parameters, so values are spliced into the text.
//! [`QueryParams`] keeps that safe: ordinary values are quote-escaped, and
//! only `&'static str` fragments may be inserted verbatim.

pub mod queries;
mod template;

pub use template::{QueryParams, QueryTemplate, RenderError};
