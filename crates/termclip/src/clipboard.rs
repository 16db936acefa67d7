use crate::escape_sequences::{BEL, MAX_PAYLOAD_BYTES, OSC52_PREFIX, OUTPUT_BUFFER_CAPACITY};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderWriter;
use log::{debug, trace};
use std::io::{self, BufWriter, Read, Write};

/// Writes OSC 52 "set clipboard" sequences to a sink.
///
/// Copies are fire-and-forget: I/O errors are logged and dropped so that a failed copy
/// never interrupts the host program. No capability check is performed here, callers
/// should consult [`crate::detect::supported`] first.
///
/// Not safe for concurrent use without external synchronization.
#[derive(Debug)]
pub struct Clipboard<W: Write> {
    sink: W,
    max_payload: usize,
}

impl Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Clipboard<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            max_payload: MAX_PAYLOAD_BYTES,
        }
    }

    /// Lowers the truncation threshold. Values above [`MAX_PAYLOAD_BYTES`] are capped.
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload.min(MAX_PAYLOAD_BYTES);
        self
    }

    pub fn max_payload(&self) -> usize {
        self.max_payload
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Streams `input` into the clipboard. At most `max_payload` bytes are read; the rest
    /// of the reader is left untouched.
    pub fn copy<R: Read>(&mut self, input: R) {
        if let Err(e) = self.try_copy(input) {
            debug!("OSC 52 stream copy failed: {}", e);
        }
    }

    pub fn copy_bytes(&mut self, data: &[u8]) {
        if let Err(e) = self.try_copy_bytes(data) {
            debug!("OSC 52 copy failed: {}", e);
        }
    }

    pub fn copy_str(&mut self, text: &str) {
        self.copy_bytes(text.as_bytes());
    }

    fn try_copy<R: Read>(&mut self, input: R) -> io::Result<()> {
        let mut buf = BufWriter::with_capacity(OUTPUT_BUFFER_CAPACITY, &mut self.sink);
        buf.write_all(OSC52_PREFIX.as_bytes())?;

        let mut limited = input.take(self.max_payload as u64);
        let copied = {
            let mut encoder = EncoderWriter::new(&mut buf, &STANDARD);
            let copied = io::copy(&mut limited, &mut encoder)?;
            encoder.finish()?;
            copied
        };
        trace!("encoded {} bytes from stream", copied);

        buf.write_all(BEL.as_bytes())?;
        buf.flush()
    }

    fn try_copy_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        let envelope = encode(data, self.max_payload);
        self.sink.write_all(&envelope)?;
        self.sink.flush()
    }
}

/// Builds the complete escape sequence for `data`, truncated to `max_payload` bytes.
pub fn encode(data: &[u8], max_payload: usize) -> Vec<u8> {
    let end = data.len().min(max_payload);
    if end < data.len() {
        trace!("truncating {} byte payload to {}", data.len(), end);
    }

    let mut output = String::with_capacity(OSC52_PREFIX.len() + end.div_ceil(3) * 4 + BEL.len());
    output.push_str(OSC52_PREFIX);
    STANDARD.encode_string(&data[..end], &mut output);
    output.push_str(BEL);
    output.into_bytes()
}

/// Streams `input` to standard output as one OSC 52 sequence.
///
/// Not safe for concurrent use without external synchronization: the sequence is written
/// in several chunks and can interleave with other writers to stdout.
pub fn copy<R: Read>(input: R) {
    Clipboard::stdout().copy(input);
}

/// Writes `data` to standard output as one OSC 52 sequence. Same concurrency caveat as
/// [`copy`].
pub fn copy_bytes(data: &[u8]) {
    Clipboard::stdout().copy_bytes(data);
}

/// [`copy_bytes`] over the UTF-8 bytes of `text`. Same concurrency caveat as [`copy`].
pub fn copy_string(text: &str) {
    Clipboard::stdout().copy_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &[u8] = b"\x1b]52;c;dGhpcyBpcyBhIHRlc3Q=\x07";

    fn captured<F: FnOnce(&mut Clipboard<Vec<u8>>)>(f: F) -> Vec<u8> {
        let mut clipboard = Clipboard::new(Vec::new());
        f(&mut clipboard);
        clipboard.into_inner()
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("read failed"))
        }
    }

    #[test]
    fn test_copy_stream() {
        let output = captured(|c| c.copy(&b"this is a test"[..]));
        assert_eq!(output, EXPECTED);
    }

    #[test]
    fn test_copy_bytes() {
        let output = captured(|c| c.copy_bytes(b"this is a test"));
        assert_eq!(output, EXPECTED);
    }

    #[test]
    fn test_copy_str() {
        let output = captured(|c| c.copy_str("this is a test"));
        assert_eq!(output, EXPECTED);
    }

    #[test]
    fn test_copy_empty() {
        assert_eq!(captured(|c| c.copy_bytes(b"")), b"\x1b]52;c;\x07");
        assert_eq!(captured(|c| c.copy(io::empty())), b"\x1b]52;c;\x07");
    }

    #[test]
    fn test_copy_str_matches_utf8_bytes() {
        let text = "héllo wörld ✓";
        let from_str = captured(|c| c.copy_str(text));
        let from_bytes = captured(|c| c.copy_bytes(text.as_bytes()));
        assert_eq!(from_str, from_bytes);
    }

    #[test]
    fn test_copy_arbitrary_bytes() {
        let output = captured(|c| c.copy_bytes(&[0x00, 0xff, 0x1b, 0x07]));
        assert_eq!(output, b"\x1b]52;c;AP8bBw==\x07");
    }

    #[test]
    fn test_stream_matches_bytes_below_threshold() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let from_stream = captured(|c| c.copy(data.as_slice()));
        let from_bytes = captured(|c| c.copy_bytes(&data));
        assert_eq!(from_stream, from_bytes);
    }

    #[test]
    fn test_copy_bytes_truncates_at_threshold() {
        let data = vec![b'a'; MAX_PAYLOAD_BYTES + 100];
        let output = captured(|c| c.copy_bytes(&data));
        assert_eq!(output, encode(&data[..MAX_PAYLOAD_BYTES], usize::MAX));
        assert_eq!(output.len(), OSC52_PREFIX.len() + 133_324 + BEL.len());
    }

    #[test]
    fn test_copy_bytes_exactly_threshold_not_truncated() {
        let data = vec![b'z'; MAX_PAYLOAD_BYTES];
        let output = captured(|c| c.copy_bytes(&data));
        assert_eq!(output, encode(&data, usize::MAX));
    }

    #[test]
    fn test_stream_truncates_at_threshold() {
        let data = vec![b'q'; MAX_PAYLOAD_BYTES * 2];
        let from_stream = captured(|c| c.copy(data.as_slice()));
        let from_bytes = captured(|c| c.copy_bytes(&data));
        assert_eq!(from_stream, from_bytes);
        assert_eq!(from_stream, encode(&data[..MAX_PAYLOAD_BYTES], usize::MAX));
    }

    #[test]
    fn test_stream_leaves_excess_unread() {
        let data = b"abcdefgh";
        let mut reader = &data[..];
        let mut clipboard = Clipboard::new(Vec::new()).with_max_payload(3);
        clipboard.copy(&mut reader);
        assert_eq!(clipboard.get_ref(), b"\x1b]52;c;YWJj\x07");
        assert_eq!(reader, b"defgh");
    }

    #[test]
    fn test_custom_max_payload() {
        let mut clipboard = Clipboard::new(Vec::new()).with_max_payload(4);
        clipboard.copy_str("this is a test");
        assert_eq!(clipboard.get_ref(), b"\x1b]52;c;dGhpcw==\x07");
    }

    #[test]
    fn test_max_payload_is_capped() {
        let clipboard = Clipboard::new(Vec::new()).with_max_payload(usize::MAX);
        assert_eq!(clipboard.max_payload(), MAX_PAYLOAD_BYTES);
    }

    #[test]
    fn test_encode_short_input_not_padded_out() {
        assert_eq!(encode(b"hi", MAX_PAYLOAD_BYTES), b"\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_encode_fills_exact_capacity() {
        let data = vec![7u8; 1000];
        let output = encode(&data, MAX_PAYLOAD_BYTES);
        assert_eq!(output.len(), OSC52_PREFIX.len() + 1336 + BEL.len());
        assert_eq!(output.capacity(), output.len());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let mut clipboard = Clipboard::new(FailingSink);
        clipboard.copy_str("this is a test");
        clipboard.copy(&b"this is a test"[..]);
    }

    #[test]
    fn test_read_failure_keeps_prefix() {
        let output = captured(|c| c.copy(FailingReader));
        assert_eq!(output, OSC52_PREFIX.as_bytes());
    }

    #[test]
    fn test_multiple_copies_append() {
        let output = captured(|c| {
            c.copy_str("this is a test");
            c.copy_str("this is a test");
        });
        assert_eq!(output, [EXPECTED, EXPECTED].concat());
    }
}
