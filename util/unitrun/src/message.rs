// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Growable message buffer used to build failure text without truncation.

use core::fmt;

/// Capacity of the first allocation.
pub const MIN_CAPACITY: usize = 16;

/// Next capacity for a full buffer: 16 first, then doubling.
#[inline]
const fn grow_capacity(capacity: usize) -> usize {
    if capacity < MIN_CAPACITY {
        MIN_CAPACITY
    } else {
        capacity * 2
    }
}

/// An owned, growable UTF-8 byte sequence.
///
/// Growth follows a fixed geometric policy so that building a message of
/// `n` bytes reallocates `O(log n)` times. The content is valid UTF-8
/// whenever it is observable from outside this module.
#[derive(Debug, Default, Clone)]
pub struct MessageBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    growths: usize,
}

impl MessageBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            capacity: 0,
            growths: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Capacity according to the growth policy.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many times the buffer had to grow.
    pub fn growths(&self) -> usize {
        self.growths
    }

    pub fn as_str(&self) -> &str {
        // Only whole `char`s and `str`s are ever appended and `reverse_tail`
        // operates on ASCII, so the bytes are always valid UTF-8.
        core::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    /// Makes room for `additional` more bytes.
    fn reserve(&mut self, additional: usize) {
        let needed = self.bytes.len() + additional;
        while self.capacity < needed {
            self.capacity = grow_capacity(self.capacity);
            self.growths += 1;
        }
        if self.bytes.capacity() < self.capacity {
            self.bytes.reserve_exact(self.capacity - self.bytes.len());
        }
    }

    /// Appends one character.
    pub fn push(&mut self, ch: char) {
        let mut utf8 = [0u8; 4];
        self.push_str(ch.encode_utf8(&mut utf8));
    }

    /// Appends every byte of `s`.
    pub fn push_str(&mut self, s: &str) {
        self.reserve(s.len());
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Reverses the bytes from `start` to the end in place.
    ///
    /// `start` must be a char boundary and the tail must be ASCII.
    pub(crate) fn reverse_tail(&mut self, start: usize) {
        debug_assert!(self.bytes[start..].is_ascii());
        self.bytes[start..].reverse();
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Consumes the buffer and returns the finished message.
    pub fn finish(self) -> String {
        String::from_utf8(self.bytes).unwrap_or_else(|err| {
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        })
    }
}

impl fmt::Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl fmt::Display for MessageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
