//! Response line framing

use bytes::BytesMut;

use crate::error::FrameError;

/// Maximum buffered response size (1MB)
const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Splits the server's byte stream into `\n`-terminated response lines
pub struct LineFramer {
    buffer: BytesMut,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Add received data to the buffer.
    ///
    /// On overflow the buffered partial line is dropped; the stream is out of
    /// step with its requests from then on.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), FrameError> {
        let size = self.buffer.len() + data.len();
        if size > MAX_MESSAGE_SIZE {
            self.buffer.clear();
            return Err(FrameError::MessageTooLarge {
                size,
                max: MAX_MESSAGE_SIZE,
            });
        }
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// Take the next complete line from the buffer, without its `\n`
    pub fn next_line(&mut self) -> Result<Option<String>, FrameError> {
        let line_end = match self.buffer.iter().position(|&b| b == b'\n') {
            Some(pos) => pos,
            None => return Ok(None), // Incomplete
        };

        let line = self.buffer.split_to(line_end + 1);
        let line = String::from_utf8(line[..line_end].to_vec())?;
        Ok(Some(line))
    }

    /// Number of buffered bytes not yet returned as a line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let mut framer = LineFramer::new();
        framer.feed(b"[1,2,3]\n").unwrap();

        assert_eq!(framer.next_line().unwrap().as_deref(), Some("[1,2,3]"));
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn test_incomplete_line() {
        let mut framer = LineFramer::new();
        framer.feed(b"\"knuckle").unwrap();

        assert!(framer.next_line().unwrap().is_none());

        framer.feed(b"ball\"\n").unwrap();
        assert_eq!(framer.next_line().unwrap().as_deref(), Some("\"knuckleball\""));
    }

    #[test]
    fn test_keeps_bytes_after_terminator() {
        let mut framer = LineFramer::new();
        framer.feed(b"true\nnull\nfal").unwrap();

        assert_eq!(framer.next_line().unwrap().as_deref(), Some("true"));
        assert_eq!(framer.next_line().unwrap().as_deref(), Some("null"));
        assert!(framer.next_line().unwrap().is_none());
        assert_eq!(framer.pending(), 3);
    }

    #[test]
    fn test_carriage_return_is_part_of_the_line() {
        let mut framer = LineFramer::new();
        framer.feed(b"null\r\n").unwrap();

        assert_eq!(framer.next_line().unwrap().as_deref(), Some("null\r"));
    }

    #[test]
    fn test_empty_line() {
        let mut framer = LineFramer::new();
        framer.feed(b"\n").unwrap();

        assert_eq!(framer.next_line().unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut framer = LineFramer::new();
        framer.feed(b"\"\xff\"\n").unwrap();

        assert!(matches!(framer.next_line(), Err(FrameError::InvalidUtf8(_))));
    }

    #[test]
    fn test_message_too_large() {
        let mut framer = LineFramer::new();
        framer.feed(&vec![b'1'; MAX_MESSAGE_SIZE]).unwrap();

        assert!(matches!(
            framer.feed(b"1"),
            Err(FrameError::MessageTooLarge { size, max }) if size == MAX_MESSAGE_SIZE + 1 && max == MAX_MESSAGE_SIZE
        ));
        assert_eq!(framer.pending(), 0);
    }
}
