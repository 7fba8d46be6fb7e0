//! Helper functions for templates
//!
//! URL generation, HTML snippets and date formatting shared by the
//! page renderers.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
