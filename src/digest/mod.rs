// src/digest/mod.rs
pub mod assemble;
pub mod format;

pub use assemble::{assemble, assemble_section, SectionHeaders};
pub use format::ItemFormatter;
