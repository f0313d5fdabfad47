//! Namespace tag rewriting

use crate::domain::rule::{ClosingTags, CompiledRule, RewriteRule};
use crate::domain::scanner::{scan_named_tag, scan_qualified_tag, tag_name_len, OpeningTag};
use crate::error::Result;
use serde::Serialize;
use tracing::debug;

/// An opening tag whose closing `>` could not be found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedTag {
    pub name: String,
    /// 1-based line in the rewritten buffer
    pub line: usize,
}

/// Counts of what a rewrite touched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    pub imports_removed: usize,
    pub opening_tags: usize,
    pub closing_tags: usize,
    pub wrappers_removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malformed: Option<MalformedTag>,
}

impl RewriteStats {
    pub fn total(&self) -> usize {
        self.imports_removed + self.opening_tags + self.closing_tags + self.wrappers_removed
    }

    fn absorb(&mut self, pass: RewriteStats) {
        self.imports_removed += pass.imports_removed;
        self.opening_tags += pass.opening_tags;
        self.closing_tags += pass.closing_tags;
        self.wrappers_removed += pass.wrappers_removed;
        self.malformed = pass.malformed;
    }
}

/// Result of rewriting one buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub content: String,
    pub stats: RewriteStats,
}

impl RewriteResult {
    pub fn changed(&self) -> bool {
        self.stats.total() > 0
    }
}

/// Rewrite `buffer` with a one-off rule.
///
/// The buffer itself never causes an error: `Err` only reports a rule that
/// fails validation, and malformed markup degrades as described on
/// [`TagRewriter::rewrite`]. Prefer [`TagRewriter`] when processing many
/// buffers with the same rule; its `rewrite` is infallible.
pub fn rewrite(buffer: &str, rule: &RewriteRule) -> Result<String> {
    let rewriter = TagRewriter::new(rule)?;
    Ok(rewriter.rewrite(buffer).content)
}

/// Strips one tag namespace from source buffers.
///
/// Holds only the compiled rule, so a single instance can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct TagRewriter {
    rule: CompiledRule,
}

impl TagRewriter {
    pub fn new(rule: &RewriteRule) -> Result<Self> {
        Ok(TagRewriter {
            rule: rule.compile()?,
        })
    }

    pub fn rule(&self) -> &CompiledRule {
        &self.rule
    }

    /// Rewrite a buffer. Never fails: an unterminated tag leaves the rest of
    /// the buffer as it was.
    pub fn rewrite(&self, buffer: &str) -> RewriteResult {
        let mut stats = RewriteStats::default();

        if !self.rule.may_apply(buffer) {
            return RewriteResult {
                content: buffer.to_string(),
                stats,
            };
        }

        // Removing an import or wrapper can join text into a new match, so
        // passes repeat until one changes nothing. Every changing pass
        // consumes at least one match and output tags never form new ones.
        let mut current = buffer.to_string();
        loop {
            let (next, pass) = self.rewrite_pass(&current);
            let done = pass.total() == 0;
            stats.absorb(pass);
            if done {
                break;
            }
            current = next;
        }

        RewriteResult {
            content: current,
            stats,
        }
    }

    fn rewrite_pass(&self, buffer: &str) -> (String, RewriteStats) {
        let mut stats = RewriteStats::default();
        let content = self.remove_imports(buffer, &mut stats);
        let content = self.rewrite_tags(&content, &mut stats);
        let content = self.remove_wrappers(&content, &mut stats);
        (content, stats)
    }

    /// Delete import statements with their line terminator. When a deleted
    /// statement sat right after a blank line (or at the start of the buffer),
    /// one following blank line goes with it so no double blank is left.
    fn remove_imports(&self, buffer: &str, stats: &mut RewriteStats) -> String {
        let mut content = buffer.to_string();

        for regex in &self.rule.import_statements {
            if !regex.is_match(&content) {
                continue;
            }

            let mut kept = String::with_capacity(content.len());
            let mut cursor = 0usize;
            for found in regex.find_iter(&content) {
                if found.start() < cursor {
                    continue;
                }
                kept.push_str(&content[cursor..found.start()]);
                cursor = found.end();
                stats.imports_removed += 1;

                if ends_with_blank_line(&kept) {
                    cursor += leading_blank_line_len(&content[cursor..]).unwrap_or(0);
                }
            }
            kept.push_str(&content[cursor..]);
            content = kept;
        }

        if self.rule.import_lines.is_empty() {
            return content;
        }

        let mut kept = String::with_capacity(content.len());
        let mut drop_blank = false;
        for line in content.split_inclusive('\n') {
            let body = line.trim_end_matches(['\n', '\r']);
            if std::mem::take(&mut drop_blank) && body.trim().is_empty() && line.ends_with('\n') {
                continue;
            }
            if self.rule.import_lines.iter().any(|r| r.is_match(body)) {
                stats.imports_removed += 1;
                drop_blank = ends_with_blank_line(&kept);
            } else {
                kept.push_str(line);
            }
        }
        kept
    }

    /// Rewrite qualified opening and closing tags in a single left-to-right
    /// pass, so closing tags can see which openers came before them.
    fn rewrite_tags(&self, buffer: &str, stats: &mut RewriteStats) -> String {
        let rule = &self.rule;
        let mut output = String::with_capacity(buffer.len());
        let mut cursor = 0usize;
        let mut openers_halted = false;
        // Rewritten openers still waiting for their closing tag; only tracked
        // when a replacement tag is set, since otherwise names already agree.
        let mut open_replacements = 0usize;
        let track_openers =
            rule.replacement_tag.is_some() && rule.closing_tags == ClosingTags::Matched;

        // Absolute offsets of the next opener and closer at or after `cursor`.
        // Each is searched again only once the cursor has passed it, and a
        // miss stays a miss, so every byte is searched at most once per needle.
        let mut next_open = find_from(buffer, &rule.opener, 0);
        let mut next_close = find_from(buffer, &rule.closer, 0);

        loop {
            if openers_halted {
                next_open = None;
            }
            if next_open.is_some_and(|o| o < cursor) {
                next_open = find_from(buffer, &rule.opener, cursor);
            }
            if next_close.is_some_and(|c| c < cursor) {
                next_close = find_from(buffer, &rule.closer, cursor);
            }

            let (at, is_open) = match (next_open, next_close) {
                (None, None) => break,
                (Some(o), None) => (o, true),
                (None, Some(c)) => (c, false),
                (Some(o), Some(c)) => {
                    if o < c {
                        (o, true)
                    } else {
                        (c, false)
                    }
                }
            };

            if !is_open {
                let name_start = at + rule.closer.len();
                let name_len = tag_name_len(buffer, name_start);
                let name_end = name_start + name_len;
                if name_len == 0 || buffer.as_bytes().get(name_end) != Some(&b'>') {
                    output.push_str(&buffer[cursor..name_start]);
                    cursor = name_start;
                    continue;
                }

                let own_name = &buffer[name_start..name_end];
                let resolved = match &rule.replacement_tag {
                    Some(replacement) if track_openers && open_replacements > 0 => {
                        open_replacements -= 1;
                        replacement.as_str()
                    }
                    _ => own_name,
                };

                output.push_str(&buffer[cursor..at]);
                output.push_str("</");
                output.push_str(resolved);
                output.push('>');
                stats.closing_tags += 1;
                cursor = name_end + 1;
                continue;
            }

            match scan_qualified_tag(buffer, at, &rule.opener) {
                OpeningTag::Found(tag) => {
                    let resolved = rule.replacement_tag.as_deref().unwrap_or(tag.name);
                    output.push_str(&buffer[cursor..at]);
                    output.push('<');
                    output.push_str(resolved);
                    if tag.self_closing {
                        output.push_str(" />");
                    } else {
                        output.push('>');
                        if track_openers {
                            open_replacements += 1;
                        }
                    }
                    stats.opening_tags += 1;
                    cursor = tag.end;
                }
                OpeningTag::NotATag => {
                    let skip = at + rule.opener.len();
                    output.push_str(&buffer[cursor..skip]);
                    cursor = skip;
                }
                OpeningTag::Unterminated { name } => {
                    let line = buffer[..at].matches('\n').count() + 1;
                    debug!(tag = name, line, "unterminated opening tag, leaving remainder as is");
                    stats.malformed = Some(MalformedTag {
                        name: name.to_string(),
                        line,
                    });
                    openers_halted = true;
                }
            }
        }

        output.push_str(&buffer[cursor..]);
        output
    }

    fn remove_wrappers(&self, buffer: &str, stats: &mut RewriteStats) -> String {
        let mut content = buffer.to_string();

        for wrapper in &self.rule.wrapper_tags {
            let opener = format!("<{}", wrapper);
            let mut output = String::with_capacity(content.len());
            let mut cursor = 0usize;

            while let Some(found) = content[cursor..].find(opener.as_str()) {
                let at = cursor + found;
                match scan_named_tag(&content, at, wrapper) {
                    OpeningTag::Found(tag) => {
                        output.push_str(&content[cursor..at]);
                        stats.wrappers_removed += 1;
                        cursor = tag.end;
                    }
                    OpeningTag::NotATag => {
                        let skip = at + opener.len();
                        output.push_str(&content[cursor..skip]);
                        cursor = skip;
                    }
                    OpeningTag::Unterminated { .. } => {
                        debug!(tag = wrapper.as_str(), "unterminated wrapper tag, leaving remainder as is");
                        break;
                    }
                }
            }
            output.push_str(&content[cursor..]);

            let closer = format!("</{}>", wrapper);
            let count = output.matches(closer.as_str()).count();
            if count > 0 {
                output = output.replace(closer.as_str(), "");
                stats.wrappers_removed += count;
            }

            content = output;
        }

        content
    }
}

/// Byte offset of the first `needle` at or after `from`
fn find_from(buffer: &str, needle: &str, from: usize) -> Option<usize> {
    buffer[from..].find(needle).map(|found| from + found)
}

/// Whether `text` is empty or its last complete line holds only whitespace
fn ends_with_blank_line(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let Some(body) = text.strip_suffix('\n') else {
        return false;
    };
    let last_line = body.rsplit('\n').next().unwrap_or(body);
    last_line.trim().is_empty()
}

/// Length of the first line of `text`, terminator included, if that line is
/// blank and terminated
fn leading_blank_line_len(text: &str) -> Option<usize> {
    let end = text.find('\n')?;
    text[..end].trim().is_empty().then_some(end + 1)
}
