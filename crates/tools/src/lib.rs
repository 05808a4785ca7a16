//! Small byte/text helpers shared by the editor crates.
pub mod utf8;
