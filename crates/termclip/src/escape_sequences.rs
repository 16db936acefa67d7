pub const OSC52_PREFIX: &str = "\x1b]52;c;";
pub const BEL: &str = "\x07";

pub const OUTPUT_BUFFER_CAPACITY: usize = 100_000;
// Largest payload encoded before truncation.
pub const MAX_PAYLOAD_BYTES: usize = 99_992;
