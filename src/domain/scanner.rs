//! Delimiter-aware scanning of opening tags
//!
//! Attribute values in JSX may hold arbitrary expressions (`onClick={() => a > b}`),
//! so the `>` that closes an opening tag is found by tracking `{`/`}` nesting
//! rather than by pattern matching.

/// A located opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOccurrence<'a> {
    /// Byte offset of the leading `<`
    pub start: usize,
    /// Bare tag name (`div` for `<motion.div>`)
    pub name: &'a str,
    /// Byte offset just past the closing `>`
    pub end: usize,
    pub self_closing: bool,
}

/// Outcome of scanning at a candidate opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpeningTag<'a> {
    Found(TagOccurrence<'a>),
    /// The prefix is not followed by a tag name
    NotATag,
    /// No zero-depth `>` before the end of the buffer
    Unterminated { name: &'a str },
}

/// Scan forward from `from` for the `>` that closes a tag, skipping any `>`
/// nested inside `{}` blocks.
///
/// Returns the offset just past the `>` and whether it was preceded by `/`.
pub fn find_tag_end(buffer: &str, from: usize) -> Option<(usize, bool)> {
    let bytes = buffer.as_bytes();
    let mut depth: i64 = 0;

    for (offset, &byte) in bytes.iter().enumerate().skip(from) {
        match byte {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            b'>' if depth == 0 => {
                let self_closing = offset > 0 && bytes[offset - 1] == b'/';
                return Some((offset + 1, self_closing));
            }
            _ => {}
        }
    }

    None
}

/// Length of the tag name (`[A-Za-z][A-Za-z0-9]*`) starting at `from`
pub fn tag_name_len(buffer: &str, from: usize) -> usize {
    let bytes = &buffer.as_bytes()[from..];
    match bytes.first() {
        Some(first) if first.is_ascii_alphabetic() => bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count(),
        _ => 0,
    }
}

/// Scan the opening tag whose `prefix` (`<motion.`) starts at `start`.
pub fn scan_qualified_tag<'a>(buffer: &'a str, start: usize, prefix: &str) -> OpeningTag<'a> {
    let name_start = start + prefix.len();
    let name_len = tag_name_len(buffer, name_start);
    if name_len == 0 {
        return OpeningTag::NotATag;
    }

    let name_end = name_start + name_len;
    let name = &buffer[name_start..name_end];

    match find_tag_end(buffer, name_end) {
        Some((end, self_closing)) => OpeningTag::Found(TagOccurrence {
            start,
            name,
            end,
            self_closing,
        }),
        None => OpeningTag::Unterminated { name },
    }
}

/// Scan a standalone opening tag `<name ...>` starting at `start`.
///
/// The name must be followed by whitespace, `/` or `>` so that
/// `<AnimatePresenceGroup>` is not taken for `<AnimatePresence>`.
pub fn scan_named_tag<'a>(buffer: &'a str, start: usize, name: &str) -> OpeningTag<'a> {
    let name_start = start + 1;
    let name_end = name_start + name.len();

    match buffer.as_bytes().get(name_end) {
        Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => {}
        _ => return OpeningTag::NotATag,
    }

    let name = &buffer[name_start..name_end];
    match find_tag_end(buffer, name_end) {
        Some((end, self_closing)) => OpeningTag::Found(TagOccurrence {
            start,
            name,
            end,
            self_closing,
        }),
        None => OpeningTag::Unterminated { name },
    }
}
