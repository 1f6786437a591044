//! Even character split of one text across an ordered run of cells.
//!
//! This is a positional heuristic, not a content-aware split: it assumes every
//! character has the same width, which holds well enough for the short numeric
//! and alphanumeric runs that tend to spill over cell borders.

/// A contiguous piece of a split text and the position of its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPiece<T> {
    pub target: T,
    pub text: String,
}

/// Partitions the characters of `text` across `targets`, in order.
///
/// With `n` targets each of the first `n - 1` receives `len / n` characters
/// and the last receives the remainder, so the pieces concatenate back to
/// `text` exactly. Empty pieces are omitted, which happens when there are more
/// targets than characters. Length is counted in `char`s, never bytes.
pub fn split_text<T: Copy>(text: &str, targets: &[T]) -> Vec<SplitPiece<T>> {
    if targets.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let n = targets.len();
    let chars_per_target = chars.len() / n;

    targets
        .iter()
        .enumerate()
        .filter_map(|(i, &target)| {
            let start = i * chars_per_target;
            let end = if i + 1 < n {
                (i + 1) * chars_per_target
            } else {
                chars.len()
            };
            let piece: String = chars[start..end].iter().collect();
            (!piece.is_empty()).then_some(SplitPiece {
                target,
                text: piece,
            })
        })
        .collect()
}
