//! Overlapping, boundary-aware text chunking.
//!
//! [`chunk_text`] is the workhorse: fixed-size windows that prefer to cut at
//! sentence terminators, then spaces, then raw offsets. [`chunk_by_paragraphs`]
//! packs blank-line separated paragraphs instead, for documents with strong
//! structural breaks. Both are pure functions of their inputs.

use serde::{Deserialize, Serialize};

/// Default window size for [`chunk_text`], in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 500;
/// Default overlap carried between consecutive windows, in bytes.
pub const DEFAULT_OVERLAP: usize = 50;
/// Default packing limit for [`chunk_by_paragraphs`], in bytes.
pub const DEFAULT_MAX_PARAGRAPH_CHUNK: usize = 1000;

/// A bounded segment of source text.
///
/// Chunks are ordered by `chunk_id` (strictly increasing from 0) and may
/// share characters with neighbors through the overlap window. `start_char`
/// and `end_char` are byte offsets into the original text, recorded before
/// trimming, so a passage can always be traced back to where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    pub chunk_id: usize,
    pub start_char: usize,
    pub end_char: usize,
}

/// Split `text` into overlapping chunks of at most `chunk_size` bytes.
///
/// Texts no longer than `chunk_size` come back as a single chunk spanning
/// the whole input (including the empty text). Longer texts are scanned
/// left to right; each window ends at the last sentence terminator
/// (`". "`, `"! "`, `"? "`) inside it when one exists past the window
/// start, else at the last space, else at the raw size cut. Chunk text is
/// trimmed and empty results are skipped. The next window starts
/// `overlap` bytes before the previous end; when that would not move the
/// scan forward the overlap is dropped for that step, so the function
/// terminates for every `chunk_size >= 1` and `overlap < chunk_size`.
///
/// Offsets are byte positions; candidate cuts snap back to UTF-8 character
/// boundaries so slicing is always valid.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<TextChunk> {
    if text.len() <= chunk_size {
        return vec![TextChunk {
            text: text.to_string(),
            chunk_id: 0,
            start_char: 0,
            end_char: text.len(),
        }];
    }

    let mut chunks = Vec::new();
    let mut chunk_id = 0usize;
    let mut start = 0usize;

    while start < text.len() {
        let mut end = floor_char_boundary(text, usize::min(start + chunk_size, text.len()));
        if end <= start {
            // chunk_size smaller than the character under the cursor
            end = next_char_boundary(text, start);
        }

        if end < text.len() {
            let window = &text[start..end];
            let sentence_end = [". ", "! ", "? "]
                .iter()
                .filter_map(|mark| window.rfind(mark))
                .max();
            match sentence_end {
                Some(rel) if rel > 0 => end = start + rel + 2,
                _ => {
                    if let Some(rel) = window.rfind(' ') {
                        if rel > 0 {
                            end = start + rel;
                        }
                    }
                }
            }
        }

        let piece = text[start..end].trim();
        if !piece.is_empty() {
            chunks.push(TextChunk {
                text: piece.to_string(),
                chunk_id,
                start_char: start,
                end_char: end,
            });
            chunk_id += 1;
        }

        if end == text.len() {
            break;
        }
        let next_start = floor_char_boundary(text, end.saturating_sub(overlap));
        start = if next_start > start { next_start } else { end };
    }

    chunks
}

/// Pack blank-line separated paragraphs into chunks of at most
/// `max_chunk_size` bytes.
///
/// Paragraphs are trimmed and empty ones skipped; consecutive paragraphs are
/// joined with `"\n\n"` until the next one would push the chunk past the
/// limit, at which point a new chunk starts. A single oversized paragraph
/// still becomes its own chunk. Always returns at least one chunk.
pub fn chunk_by_paragraphs(text: &str, max_chunk_size: usize) -> Vec<TextChunk> {
    let mut chunks = Vec::new();
    let mut chunk_id = 0usize;
    let mut current: Vec<&str> = Vec::new();
    let mut current_size = 0usize;
    let mut start_char = 0usize;

    for para in text.split("\n\n") {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }

        if current_size + para.len() > max_chunk_size && !current.is_empty() {
            let joined = current.join("\n\n");
            let joined_len = joined.len();
            chunks.push(TextChunk {
                text: joined,
                chunk_id,
                start_char,
                end_char: start_char + joined_len,
            });
            chunk_id += 1;
            start_char += joined_len + 2;
            current.clear();
            current_size = 0;
        }

        current_size += para.len() + 2;
        current.push(para);
    }

    if !current.is_empty() {
        let joined = current.join("\n\n");
        let joined_len = joined.len();
        chunks.push(TextChunk {
            text: joined,
            chunk_id,
            start_char,
            end_char: start_char + joined_len,
        });
    }

    if chunks.is_empty() {
        return vec![TextChunk {
            text: text.to_string(),
            chunk_id: 0,
            start_char: 0,
            end_char: text.len(),
        }];
    }
    chunks
}

/// Largest char boundary at or below `index`.
pub(crate) fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary strictly above `index`, capped at the text length.
fn next_char_boundary(text: &str, index: usize) -> usize {
    let mut end = usize::min(index + 1, text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    end
}
