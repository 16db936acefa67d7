//! Copy to the system clipboard through the terminal using the OSC 52 escape sequence.
//!
//! [`detect`] decides whether the attached terminal is expected to honor the sequence and
//! [`clipboard`] frames and writes it. The copy functions never check support themselves;
//! that decision belongs to the caller.

pub mod clipboard;
pub mod config;
pub mod detect;
pub mod escape_sequences;

pub use clipboard::{Clipboard, copy, copy_bytes, copy_string};
pub use detect::{supported, supported_with};
