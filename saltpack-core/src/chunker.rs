//! Plaintext chunking with the per-version terminator convention.
//!
//! v1 marks the end of a message with one extra empty chunk; v2 sets a
//! final flag on the last data-carrying chunk instead. An empty
//! plaintext yields exactly one empty chunk in both versions — in v1 it
//! is the terminator, in v2 it carries the final flag.

use crate::version::Version;

/// One chunk of plaintext with its packet position.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Chunk<'a> {
    /// Zero-based packet sequence number; drives the payload nonce.
    pub index: u64,
    pub data: &'a [u8],
    /// True on the terminating chunk. Consumers of v1 packets ignore it;
    /// the trailing empty chunk is the v1 terminator on the wire.
    pub last: bool,
}

/// Splits a message into `chunk_size` slices, lazily.
pub(crate) struct Chunker<'a> {
    message: &'a [u8],
    chunk_size: usize,
    version: Version,
    next_start: usize,
    next_index: u64,
    finished: bool,
}

impl<'a> Chunker<'a> {
    /// # Panics
    /// Panics if `chunk_size` is zero.
    pub(crate) fn new(message: &'a [u8], chunk_size: usize, version: Version) -> Chunker<'a> {
        assert!(chunk_size > 0, "chunk size must be positive");
        Chunker {
            message,
            chunk_size,
            version,
            next_start: 0,
            next_index: 0,
            finished: false,
        }
    }
}

impl<'a> Iterator for Chunker<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        if self.finished {
            return None;
        }

        // Empty message: a single empty chunk ends the stream.
        if self.message.is_empty() {
            self.finished = true;
            return Some(Chunk {
                index: 0,
                data: &[],
                last: true,
            });
        }

        // Past the data in v1: emit the empty terminator chunk.
        if self.next_start >= self.message.len() {
            self.finished = true;
            return Some(Chunk {
                index: self.next_index,
                data: &[],
                last: true,
            });
        }

        let end = usize::min(self.next_start + self.chunk_size, self.message.len());
        let chunk = Chunk {
            index: self.next_index,
            data: &self.message[self.next_start..end],
            last: self.version.has_final_flag() && end >= self.message.len(),
        };
        self.next_start = end;
        self.next_index += 1;
        if chunk.last {
            self.finished = true;
        }
        Some(chunk)
    }
}
