pub mod compiler;
pub mod error;
pub mod interpreter;
pub mod objects;
pub mod parser;

#[cfg(test)]
mod test;

pub const COMMENT_STR: &str = "#";
pub const SCHEME_EXTENSION: &str = ".ts";

/// Default lengths (in nt) for the two domain length classes.
pub const SHORT_DOM_LEN: usize = 5;
pub const LONG_DOM_LEN: usize = 15;

/// Explicit lengths up to this are classified as short domains.
pub const DTYPE_CUTOFF: usize = 8;

pub const PREFIX_SHORT: &str = "t";
pub const PREFIX_LONG: &str = "d";
pub const PREFIX_HISTORY: &str = "h";
pub const PREFIX_UNIQUE: &str = "u";
pub const PREFIX_FUEL: &str = "f";
