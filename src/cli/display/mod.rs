//! Display primitives shared by command output.

pub mod colors;
pub mod table;

pub use colors::{colorize_cached, colorize_score};
pub use table::{list_table, render_list, section};
