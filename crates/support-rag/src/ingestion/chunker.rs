//! Recursive character chunking with overlap
//!
//! Text is split on the coarsest separator present (paragraphs, then lines,
//! then words, then graphemes). Pieces that are still too large are split
//! again with the next separator; small pieces are merged back together up
//! to `chunk_size` characters, carrying up to `overlap` characters of the
//! previous chunk into the next one.

use std::collections::VecDeque;

use unicode_segmentation::UnicodeSegmentation;

use crate::types::Chunk;

/// Separators tried in order, coarsest first. The empty separator splits
/// into graphemes and always applies.
const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    overlap: usize,
    /// Separators, coarsest first
    separators: Vec<String>,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Chunk a document, numbering chunks in order
    pub fn chunk_document(&self, content: &str, source: &str) -> Vec<Chunk> {
        self.split_text(content)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(text, source, i as u32))
            .collect()
    }

    /// Split text into chunk strings
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut small: Vec<&str> = Vec::new();
        for piece in split_on(text, separator) {
            if char_len(piece) < self.chunk_size {
                small.push(piece);
                continue;
            }

            if !small.is_empty() {
                final_chunks.extend(self.merge_splits(&small, separator));
                small.clear();
            }
            if finer.is_empty() {
                final_chunks.push(piece.to_string());
            } else {
                final_chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !small.is_empty() {
            final_chunks.extend(self.merge_splits(&small, separator));
        }

        final_chunks
    }

    /// Merge small pieces into chunks of at most `chunk_size` characters
    fn merge_splits(&self, splits: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in splits {
            let len = char_len(piece);
            let joiner = |current: &VecDeque<&str>| if current.is_empty() { 0 } else { sep_len };

            if total + len + joiner(&current) > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of {} characters, longer than the limit of {}",
                        total,
                        self.chunk_size
                    );
                }

                if !current.is_empty() {
                    if let Some(chunk) = join_trimmed(&current, separator) {
                        chunks.push(chunk);
                    }

                    // Keep at most `overlap` characters as the head of the next chunk
                    while total > self.overlap
                        || (total > 0 && total + len + joiner(&current) > self.chunk_size)
                    {
                        let Some(first) = current.front() else { break };
                        let dropped = char_len(first) + if current.len() > 1 { sep_len } else { 0 };
                        total = total.saturating_sub(dropped);
                        current.pop_front();
                    }
                }
            }

            current.push_back(piece);
            total += len + if current.len() > 1 { sep_len } else { 0 };
        }

        if let Some(chunk) = join_trimmed(&current, separator) {
            chunks.push(chunk);
        }

        chunks
    }
}

fn split_on<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.graphemes(true).collect()
    } else {
        text.split(separator).filter(|s| !s.is_empty()).collect()
    }
}

fn join_trimmed(parts: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = parts.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(n: usize) -> String {
        (0..n).map(|i| format!("w{:02}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_short_document_is_one_chunk() {
        let chunker = TextChunker::new(200, 50);
        let chunks = chunker.split_text("Para one.\n\nPara two.");
        assert_eq!(chunks, vec!["Para one.\n\nPara two.".to_string()]);
    }

    #[test]
    fn test_empty_document_has_no_chunks() {
        let chunker = TextChunker::new(200, 50);
        assert!(chunker.split_text("").is_empty());
        assert!(chunker.split_text("   \n\n  ").is_empty());
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let chunker = TextChunker::new(20, 8);
        let text = numbered_words(60);
        let chunks = chunker.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 20, "chunk too long: {:?}", chunk);
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let chunker = TextChunker::new(20, 8);
        let chunks = chunker.split_text(&numbered_words(12));

        assert_eq!(chunks[0], "w00 w01 w02 w03 w04");
        assert!(chunks[1].starts_with("w03 w04 w05"));
    }

    #[test]
    fn test_oversized_word_falls_back_to_graphemes() {
        let chunker = TextChunker::new(10, 0);
        let chunks = chunker.split_text("abcdefghijklmnopqrstuvwxyz");

        assert_eq!(chunks, vec!["abcdefghij", "klmnopqrst", "uvwxyz"]);
    }

    #[test]
    fn test_paragraphs_split_before_lines() {
        let chunker = TextChunker::new(40, 0);
        let text = "SmartWatch Pro X costs 15,999.\n\nReturns accepted within 7 days.";
        let chunks = chunker.split_text(text);

        assert_eq!(
            chunks,
            vec!["SmartWatch Pro X costs 15,999.", "Returns accepted within 7 days."]
        );
    }

    #[test]
    fn test_chunk_document_numbers_chunks() {
        let chunker = TextChunker::new(20, 8);
        let chunks = chunker.chunk_document(&numbered_words(30), "product_info.txt");

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.metadata.chunk_id, i as u32);
            assert_eq!(chunk.metadata.source, "product_info.txt");
            assert!(!chunk.is_embedded());
        }
    }
}
