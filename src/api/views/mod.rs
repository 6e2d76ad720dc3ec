//! View rendering

mod html;

pub use html::{escape_html, HtmlViewRenderer};

use crate::domain::account::View;

/// Turns a [`View`] into a page body
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &View) -> String;
}
