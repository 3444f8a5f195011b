//! Helper functions shared by the content pipeline and commands

mod date;
mod html;
mod links;

pub use date::*;
pub use html::*;
pub use links::*;
