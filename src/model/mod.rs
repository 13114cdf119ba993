//! Document model types.
//!
//! `DocumentModel` is the bridge between extraction and layout;
//! `PageLayout` is the bridge between layout and rasterization.
//! Neither knows anything about LaTeX syntax or pixels.

mod document;
mod layout;

pub use document::{DocumentModel, Section, SectionLevel, DEFAULT_TITLE};
pub use layout::{Alignment, LayoutLine, PageLayout, StyleTag};
