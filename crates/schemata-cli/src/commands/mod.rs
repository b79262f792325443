//! CLI commands

mod list;
mod show;
mod validate;

pub use list::list;
pub use show::show;
pub use validate::validate;
