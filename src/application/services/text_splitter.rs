use std::collections::VecDeque;

use crate::domain::entities::{Chunk, SourceDocument};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Splits text on the coarsest separator present, recursing into pieces that are
/// still too long, then greedily merges pieces back into overlapping chunks.
///
/// Lengths are counted in `char`s, not bytes or tokens.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    separators: Vec<&'static str>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self {
            separators: vec![
                "\n\n", // Double newline (paragraphs)
                "\n",   // Single newline
                " ",    // Space
                "",     // Character level
            ],
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, String> {
        if chunk_size == 0 {
            return Err("Chunk size must be greater than zero".to_string());
        }
        if chunk_overlap > chunk_size {
            return Err(format!(
                "Chunk overlap ({}) must not exceed chunk size ({})",
                chunk_overlap, chunk_size
            ));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.recursive_split(text, &self.separators)
    }

    /// Every chunk inherits a copy of its source document's metadata.
    pub fn split_documents(&self, documents: &[SourceDocument]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|document| {
                self.split_text(document.text())
                    .into_iter()
                    .map(|text| Chunk::new(text, document.metadata().clone()))
            })
            .collect()
    }

    fn recursive_split(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        let mut separator = separators.last().copied().unwrap_or("");
        let mut remaining: &[&'static str] = &[];

        for (index, &candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                remaining = &separators[index + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut good_splits: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if remaining.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.recursive_split(&piece, remaining));
            }
        }

        if !good_splits.is_empty() {
            chunks.extend(self.merge_splits(&good_splits));
        }

        chunks
    }

    fn merge_splits(&self, splits: &[String]) -> Vec<String> {
        let mut merged = Vec::new();
        let mut current: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0;

        for piece in splits {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }

                if !current.is_empty() {
                    if let Some(chunk) = join_pieces(&current) {
                        merged.push(chunk);
                    }

                    // Keep at most `chunk_overlap` chars as the head of the next chunk.
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some((_, front_len)) => total -= front_len,
                            None => break,
                        }
                    }
                }
            }

            current.push_back((piece.as_str(), len));
            total += len;
        }

        if let Some(chunk) = join_pieces(&current) {
            merged.push(chunk);
        }

        merged
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Splits on `separator`, re-attaching it to the start of each following piece.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces = Vec::new();

    if let Some(first) = parts.next() {
        pieces.push(first.to_string());
    }
    pieces.extend(parts.map(|part| format!("{}{}", separator, part)));

    pieces.retain(|piece| !piece.is_empty());
    pieces
}

fn join_pieces(pieces: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = pieces.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
