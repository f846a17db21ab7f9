use smallvec::SmallVec;

use crate::{error::LinkError, protocol};

/// Argument tokens of one line; nearly every command fits inline.
pub type Tokens<'a> = SmallVec<[&'a str; 8]>;

/// Split a line into at most [`protocol::MAX_TOKENS`] whitespace-delimited
/// tokens. Tokens beyond the bound are dropped.
#[must_use]
pub fn tokenize(line: &str) -> Tokens<'_> {
    let mut words = line.split_whitespace();
    let tokens: Tokens = words.by_ref().take(protocol::MAX_TOKENS).collect();
    if words.next().is_some() {
        tracing::trace!("dropping tokens beyond the protocol bound");
    }
    tokens
}

/// Fixed-capacity receive buffer that reassembles newline-framed lines.
///
/// Bytes are appended at the tail by the socket read path and consumed from
/// the head here. An oversized line (a full buffer with no newline) flips
/// the reader into discard mode: everything buffered is dropped, and bytes
/// keep being dropped until the newline that ends the oversized line, so
/// the *following* line parses intact.
#[derive(Debug)]
pub struct LineReader {
    buf: Box<[u8]>,
    len: usize,
    input_too_long: bool,
}

impl LineReader {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity].into_boxed_slice(),
            len: 0,
            input_too_long: false,
        }
    }

    /// Free tail space for the socket read path to fill.
    pub fn vacant(&mut self) -> &mut [u8] {
        &mut self.buf[self.len..]
    }

    /// Record `n` bytes just written into [`Self::vacant`].
    pub fn commit(&mut self, n: usize) {
        self.len = (self.len + n).min(self.buf.len());
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Extract the next complete line, or `None` until more bytes arrive.
    ///
    /// Leading NUL padding between lines is skipped and empty or
    /// whitespace-only lines are consumed silently, neither produces a
    /// line.
    pub fn next_line(&mut self) -> Option<String> {
        loop {
            // NUL padding accumulated between lines.
            match self.buf[..self.len].iter().position(|&b| b != 0) {
                None => {
                    self.len = 0;
                    return None;
                }
                Some(0) => {}
                Some(skip) => self.consume(skip),
            }

            let Some(end) = self.buf[..self.len].iter().position(|&b| b == b'\n') else {
                if self.is_full() {
                    tracing::warn!(
                        capacity = self.buf.len(),
                        "line exceeds the receive buffer, resynchronizing at the next newline"
                    );
                    self.input_too_long = true;
                    self.len = 0;
                }
                return None;
            };

            let line = String::from_utf8_lossy(&self.buf[..end]).into_owned();
            self.consume(end + 1);

            if self.input_too_long {
                // This is the tail of the oversized line, not a real one.
                self.input_too_long = false;
                tracing::debug!("discarded the tail of an oversized line");
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            return Some(line);
        }
    }

    /// Drop `n` bytes from the head, shifting the remainder forward.
    fn consume(&mut self, n: usize) {
        self.buf.copy_within(n..self.len, 0);
        self.len -= n;
    }
}

/// Fixed-capacity send buffer with overflow refusal and recovery notice.
///
/// A write that does not fit whole is refused outright (never partially
/// appended) and latches the overflow flag; every send while latched is
/// refused too. The first drain that finds enough freed room injects one
/// [`protocol::STALL_NOTICE`] so the peer learns data was dropped, then the
/// flag clears and writes resume.
#[derive(Debug)]
pub struct SendQueue {
    buf: Box<[u8]>,
    len: usize,
    overflowed: bool,
}

impl SendQueue {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity].into_boxed_slice(),
            len: 0,
            overflowed: false,
        }
    }

    /// Append `text`, refusing (and latching overflow) when it cannot fit.
    pub fn enqueue(&mut self, text: &str) -> Result<(), LinkError> {
        if self.overflowed {
            return Err(LinkError::OutputOverflow);
        }
        if self.len + text.len() > self.buf.len() {
            tracing::warn!(
                pending = self.len,
                refused = text.len(),
                "send buffer overflow, write refused"
            );
            self.overflowed = true;
            return Err(LinkError::OutputOverflow);
        }
        self.buf[self.len..self.len + text.len()].copy_from_slice(text.as_bytes());
        self.len += text.len();
        Ok(())
    }

    /// Append the stall notice if an overflow is latched and there is room
    /// for it, clearing the latch. The write path calls this before each
    /// drain; returns whether the notice was queued.
    pub fn recover(&mut self) -> bool {
        if !self.overflowed || self.len + protocol::STALL_NOTICE.len() > self.buf.len() {
            return false;
        }
        self.buf[self.len..self.len + protocol::STALL_NOTICE.len()]
            .copy_from_slice(protocol::STALL_NOTICE.as_bytes());
        self.len += protocol::STALL_NOTICE.len();
        self.overflowed = false;
        tracing::debug!("send overflow recovered, stall notice queued");
        true
    }

    /// Bytes awaiting transmission.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Drop `n` transmitted bytes from the head.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.len);
        self.buf.copy_within(n..self.len, 0);
        self.len -= n;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn feed(reader: &mut LineReader, bytes: &[u8]) {
        let space = reader.vacant();
        assert!(bytes.len() <= space.len(), "test chunk exceeds free space");
        space[..bytes.len()].copy_from_slice(bytes);
        reader.commit(bytes.len());
    }

    fn drain(reader: &mut LineReader) -> Vec<String> {
        std::iter::from_fn(|| reader.next_line()).collect()
    }

    #[test]
    fn lines_come_out_in_order() {
        let mut reader = LineReader::new(64);
        feed(&mut reader, b"GetX\nSetAhead 5\nGet");
        assert_eq!(vec!["GetX", "SetAhead 5"], drain(&mut reader));
        feed(&mut reader, b"Y\n");
        assert_eq!(vec!["GetY"], drain(&mut reader));
    }

    #[test]
    fn empty_and_whitespace_lines_are_skipped() {
        let mut reader = LineReader::new(64);
        feed(&mut reader, b"\n   \nGetX\n\t\nGetY\n");
        assert_eq!(vec!["GetX", "GetY"], drain(&mut reader));
    }

    #[test]
    fn nul_padding_between_lines_is_skipped() {
        let mut reader = LineReader::new(64);
        feed(&mut reader, b"\0\0GetX\n\0GetY\n\0\0");
        assert_eq!(vec!["GetX", "GetY"], drain(&mut reader));
        assert!(reader.is_empty());
    }

    #[test]
    fn oversized_line_is_discarded_and_the_next_parses_intact() {
        let mut reader = LineReader::new(16);
        feed(&mut reader, b"AAAAAAAAAAAAAAAA");
        assert_eq!(None, reader.next_line());
        assert!(reader.is_empty());

        // Tail of the oversized line, then a real one.
        feed(&mut reader, b"AAAA\nGetX\n");
        assert_eq!(vec!["GetX"], drain(&mut reader));
    }

    #[test]
    fn oversized_line_spanning_several_buffers_is_still_discarded() {
        let mut reader = LineReader::new(8);
        feed(&mut reader, b"AAAAAAAA");
        assert_eq!(None, reader.next_line());
        feed(&mut reader, b"BBBBBBBB");
        assert_eq!(None, reader.next_line());
        feed(&mut reader, b"C\nGetX\n");
        assert_eq!(vec!["GetX"], drain(&mut reader));
    }

    #[rstest::rstest]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    #[test]
    fn chunked_feeding_yields_the_same_lines(#[case] chunk: usize) {
        let stream = b"GetX\n\0\0SetAhead 12.5\n\nGetHeading\nSetSpeed 0.5\n";

        let mut whole = LineReader::new(128);
        feed(&mut whole, stream);
        let expected = drain(&mut whole);

        let mut reader = LineReader::new(128);
        let mut lines = Vec::new();
        for piece in stream.chunks(chunk) {
            feed(&mut reader, piece);
            lines.extend(drain(&mut reader));
        }
        assert_eq!(expected, lines);
    }

    #[test]
    fn random_split_points_yield_the_same_lines() {
        let stream = b"GetX\nSetTurnLeft 90\n\0GetGunHeat\nExecute\nGetObstacles\n";

        let mut whole = LineReader::new(128);
        feed(&mut whole, stream);
        let expected = drain(&mut whole);

        let mut rng = rand::rng();
        for _ in 0..50 {
            let mut reader = LineReader::new(128);
            let mut lines = Vec::new();
            let mut rest: &[u8] = stream;
            while !rest.is_empty() {
                let take = rng.random_range(1..=rest.len());
                feed(&mut reader, &rest[..take]);
                lines.extend(drain(&mut reader));
                rest = &rest[take..];
            }
            assert_eq!(expected, lines);
        }
    }

    #[test]
    fn tokenize_bounds_the_token_count() {
        let line = "Cmd ".to_string() + &"x ".repeat(protocol::MAX_TOKENS + 10);
        assert_eq!(protocol::MAX_TOKENS, tokenize(&line).len());
        assert_eq!(vec!["SetAhead", "5"], tokenize(" SetAhead  5 ").to_vec());
    }

    #[test]
    fn overflow_refuses_without_corrupting_buffered_data() {
        let mut queue = SendQueue::new(32);
        assert!(queue.enqueue(&"x".repeat(30)).is_ok());
        assert!(matches!(
            queue.enqueue("abc"),
            Err(LinkError::OutputOverflow)
        ));
        assert!(queue.overflowed());
        // Latched: even a fitting write is refused now.
        assert!(matches!(queue.enqueue("a"), Err(LinkError::OutputOverflow)));
        assert_eq!("x".repeat(30).as_bytes(), queue.pending());
    }

    #[test]
    fn recovery_injects_exactly_one_notice_then_sends_resume() {
        let mut queue = SendQueue::new(64);
        assert!(queue.enqueue(&"x".repeat(40)).is_ok());
        assert!(queue.enqueue(&"y".repeat(30)).is_err());

        // Nothing drained yet: no room for the notice.
        assert!(!queue.recover());
        assert!(queue.overflowed());

        queue.consume(40);
        assert!(queue.recover());
        assert!(!queue.overflowed());
        assert_eq!(protocol::STALL_NOTICE.as_bytes(), queue.pending());

        // Exactly one notice.
        assert!(!queue.recover());
        queue.consume(queue.len());
        assert!(queue.enqueue("GetX\n").is_ok());
        assert_eq!(b"GetX\n", queue.pending());
    }
}
