use crate::buffer::MAX_BUFFER_SIZE;
use crate::error::{Error, Result};

/// Heap block large enough for any reparse buffer, freed when dropped.
pub(crate) struct ScratchBuffer {
    value: Box<[u8]>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        // Too large to put on the stack of every caller.
        Self {
            value: vec![0u8; MAX_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.value
    }

    /// The first `len` bytes, as reported by the transfer that filled the buffer.
    pub fn filled(&self, len: usize) -> Result<&[u8]> {
        self.value
            .get(..len)
            .ok_or(Error::MalformedRecord("transfer reported more bytes than the buffer holds"))
    }
}
