//! Splitting of long transcripts into pieces that fit a model's context window.

/// Splits `text` into consecutive chunks of at most `max_chars` characters.
///
/// Each chunk ends at the last newline inside its window when there is one past
/// the window start, so speaker turns are not cut in half. Concatenating the
/// chunks yields `text` unchanged.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = text[start..]
            .char_indices()
            .nth(max_chars)
            .map(|(offset, _)| start + offset)
            .unwrap_or(text.len());

        if end < text.len() {
            if let Some(newline) = text[start..end].rfind('\n') {
                if newline > 0 {
                    end = start + newline;
                }
            }
        }

        chunks.push(&text[start..end]);
        start = end;
    }

    chunks
}
