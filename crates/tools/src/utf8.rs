//! Incremental UTF-8 decoding for files read in chunks.
//!
//! Multi-byte characters split across chunk boundaries are stitched back together,
//! and invalid sequences become U+FFFD so decoding always makes progress.

const BOM: char = '\u{FEFF}';

/// Streaming lossy decoder. Feed chunks with [`Utf8Decoder::push`], then call
/// [`Utf8Decoder::finish`] to get the text.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    text: String,
    carry: Vec<u8>,
    replaced: usize,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        let before = self.text.len();
        push_utf8_chunk(&mut self.text, &mut self.carry, bytes);
        self.replaced += count_replacements(&self.text[before..]);
    }

    /// Number of U+FFFD characters produced so far for invalid input.
    /// Replacement characters that were already in the source are counted too.
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    /// Flushes any incomplete trailing sequence and strips a leading byte order mark.
    pub fn finish(mut self) -> String {
        let before = self.text.len();
        finish_utf8(&mut self.text, &mut self.carry);
        self.replaced += count_replacements(&self.text[before..]);
        if self.text.starts_with(BOM) {
            self.text.drain(..BOM.len_utf8());
        }
        self.text
    }
}

fn count_replacements(s: &str) -> usize {
    s.chars().filter(|&c| c == '\u{FFFD}').count()
}

/// Append a byte chunk to `text`. `carry` holds an incomplete UTF-8 suffix between calls.
pub fn push_utf8_chunk(text: &mut String, carry: &mut Vec<u8>, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    if carry.is_empty() {
        decode_bytes(text, carry, bytes);
        return;
    }

    // The carry is at most 3 bytes; complete it from the head of this chunk,
    // then decode the rest in place.
    let mut remaining = bytes;
    while !carry.is_empty() && !remaining.is_empty() {
        let expected_len = utf8_seq_len(carry[0]);
        if expected_len == 0 {
            text.push('\u{FFFD}');
            carry.clear();
            break;
        }

        let needed = expected_len.saturating_sub(carry.len());
        if needed == 0 {
            let pending = std::mem::take(carry);
            decode_bytes(text, carry, &pending);
            continue;
        }
        if remaining.len() < needed {
            carry.extend_from_slice(remaining);
            return;
        }

        let mut scratch = [0u8; 8];
        let carry_len = carry.len();
        scratch[..carry_len].copy_from_slice(carry);
        scratch[carry_len..carry_len + needed].copy_from_slice(&remaining[..needed]);
        carry.clear();
        decode_bytes(text, carry, &scratch[..carry_len + needed]);
        remaining = &remaining[needed..];
    }

    if !remaining.is_empty() {
        decode_bytes(text, carry, remaining);
    }
}

/// Flush carried bytes (lossy) so a truncated stream is never silently shortened.
pub fn finish_utf8(text: &mut String, carry: &mut Vec<u8>) {
    if carry.is_empty() {
        return;
    }
    text.push_str(&String::from_utf8_lossy(carry));
    carry.clear();
}

fn utf8_seq_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn decode_bytes(text: &mut String, carry: &mut Vec<u8>, mut bytes: &[u8]) {
    while !bytes.is_empty() {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                text.push_str(s);
                break;
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                // `valid_up_to` marks a char boundary, so the lossy path never substitutes here.
                text.push_str(&String::from_utf8_lossy(&bytes[..valid_up_to]));
                match e.error_len() {
                    Some(len) => {
                        text.push('\u{FFFD}');
                        bytes = &bytes[valid_up_to + len..];
                    }
                    None => {
                        carry.extend_from_slice(&bytes[valid_up_to..]);
                        break;
                    }
                }
            }
        }
    }
}
