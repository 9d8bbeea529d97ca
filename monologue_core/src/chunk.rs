//! Word-boundary-safe windowing over the monologue text.
//!
//! Excerpts are variable-length rather than fixed-size character windows:
//! the start is realigned to the beginning of a word and a cut that would
//! split a word is extended to the next boundary. This keeps displayed
//! output free of mid-word truncation.

/// Characters that separate words in the monologue.
pub(crate) fn is_boundary(c: char) -> bool {
    c == ' ' || c == '\n'
}

fn floor_char_boundary(text: &str, mut pos: usize) -> usize {
    pos = pos.min(text.len());
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Realign a position to the start of the word it falls in.
///
/// Any boundary run at the position is skipped forward first, then the
/// position walks back to the word start. Positions inside a word therefore
/// snap leftward, while positions on a space move to the next word instead
/// of re-reading the previous one.
pub(crate) fn snap_to_word_start(text: &str, pos: usize) -> usize {
    let pos = floor_char_boundary(text, pos);

    let mut pos = match text[pos..].char_indices().find(|(_, c)| !is_boundary(*c)) {
        Some((offset, _)) => pos + offset,
        None => return text.len(),
    };

    while pos > 0 {
        let prev = match text[..pos].chars().next_back() {
            Some(c) => c,
            None => break,
        };
        if is_boundary(prev) {
            break;
        }
        pos -= prev.len_utf8();
    }
    pos
}

/// Extend a cut position rightward if it would split a word.
fn extend_past_word(text: &str, pos: usize) -> usize {
    let pos = floor_char_boundary(text, pos);
    if pos == 0 || pos >= text.len() {
        return pos.min(text.len());
    }

    let next = match text[pos..].chars().next() {
        Some(c) => c,
        None => return text.len(),
    };
    let prev = match text[..pos].chars().next_back() {
        Some(c) => c,
        None => return pos,
    };

    // A cut that touches a boundary on either side splits nothing.
    if is_boundary(next) || is_boundary(prev) {
        return pos;
    }

    match text[pos..].find(is_boundary) {
        Some(offset) => pos + offset,
        None => text.len(),
    }
}

/// Compute the `[start, end)` window for the next excerpt.
///
/// The cursor wraps to 0 when at or past the end of text; `target_chars`
/// is measured in characters from the realigned start.
pub(crate) fn window(text: &str, cursor: usize, target_chars: usize) -> (usize, usize) {
    if text.is_empty() {
        return (0, 0);
    }

    let cursor = if cursor >= text.len() { 0 } else { cursor };
    let start = snap_to_word_start(text, cursor);

    let raw_end = match text[start..].char_indices().nth(target_chars) {
        Some((offset, _)) => start + offset,
        None => text.len(),
    };

    (start, extend_past_word(text, raw_end))
}

/// Byte offset of the character at `char_idx`, or the text length when the
/// index is past the end.
pub(crate) fn byte_pos_of_char(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or_else(|| text.len())
}

/// Snap an insertion position to the nearer word boundary.
///
/// Looks forward to the next boundary and backward to the previous one;
/// ties go forward. The ends of the chunk count as boundaries.
pub(crate) fn snap_insert_pos(chunk: &str, pos: usize) -> usize {
    let pos = floor_char_boundary(chunk, pos);

    let forward = chunk[pos..]
        .find(is_boundary)
        .map(|offset| pos + offset)
        .unwrap_or_else(|| chunk.len());
    let backward = chunk[..pos].rfind(is_boundary).unwrap_or(0);

    if forward - pos <= pos - backward {
        forward
    } else {
        backward
    }
}

/// Splice a fragment into the chunk at a cut position.
///
/// The space before the cut and after the cut are trimmed, then the pieces
/// are joined with single spaces; a separator is omitted next to an empty
/// side.
pub(crate) fn splice(chunk: &str, at: usize, fragment: &str) -> String {
    let at = floor_char_boundary(chunk, at);
    let before = chunk[..at].trim_end();
    let after = chunk[at..].trim_start();

    match (before.is_empty(), after.is_empty()) {
        (true, true) => fragment.to_string(),
        (true, false) => format!("{fragment} {after}"),
        (false, true) => format!("{before} {fragment}"),
        (false, false) => format!("{before} {fragment} {after}"),
    }
}
