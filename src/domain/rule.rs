//! Rewrite rule configuration and compilation

use crate::error::{Result, TagstripError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

fn namespace_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap())
}

fn tag_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap())
}

/// How closing tags are renamed when a fixed replacement tag is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClosingTags {
    /// Closing tags take the name their opener was rewritten to
    #[default]
    Matched,
    /// Closing tags keep their own bare name, even if the opener was replaced
    Original,
}

impl FromStr for ClosingTags {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "matched" => Ok(ClosingTags::Matched),
            "original" => Ok(ClosingTags::Original),
            _ => Err(format!(
                "Invalid closing tag mode: '{}'. Valid modes are: matched, original",
                s
            )),
        }
    }
}

/// What to strip from a source buffer.
///
/// A rule names one tag namespace (`motion` in `<motion.div>`), the modules
/// whose import statements should disappear with it, and any wrapper
/// components that only make sense alongside the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteRule {
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement_tag: Option<String>,
    pub wrapper_tags: Vec<String>,
    pub import_modules: Vec<String>,
    pub import_patterns: Vec<String>,
    pub closing_tags: ClosingTags,
}

impl Default for RewriteRule {
    fn default() -> Self {
        Self::framer_motion()
    }
}

impl RewriteRule {
    /// Rule for removing framer-motion: `<motion.*>` tags, `AnimatePresence`
    /// wrappers and imports from `framer-motion`.
    pub fn framer_motion() -> Self {
        RewriteRule {
            namespace: "motion".to_string(),
            replacement_tag: None,
            wrapper_tags: vec!["AnimatePresence".to_string()],
            import_modules: vec!["framer-motion".to_string()],
            import_patterns: Vec::new(),
            closing_tags: ClosingTags::Matched,
        }
    }

    /// Rule that only rewrites tags of the given namespace
    pub fn for_namespace(namespace: &str) -> Self {
        RewriteRule {
            namespace: namespace.to_string(),
            replacement_tag: None,
            wrapper_tags: Vec::new(),
            import_modules: Vec::new(),
            import_patterns: Vec::new(),
            closing_tags: ClosingTags::Matched,
        }
    }

    /// Validate the rule and build its matchers
    pub fn compile(&self) -> Result<CompiledRule> {
        if !namespace_regex().is_match(&self.namespace) {
            return Err(TagstripError::InvalidRule(format!(
                "namespace '{}' is not an identifier",
                self.namespace
            )));
        }

        if let Some(tag) = &self.replacement_tag {
            validate_tag_name("replacement_tag", tag)?;
        }

        for tag in &self.wrapper_tags {
            validate_tag_name("wrapper_tags", tag)?;
        }

        let mut import_statements = Vec::with_capacity(self.import_modules.len());
        for module in &self.import_modules {
            if module.is_empty() || module.contains(['"', '\'', '\n', '\r']) {
                return Err(TagstripError::InvalidRule(format!(
                    "import module '{}' must be a bare module specifier",
                    module
                )));
            }
            import_statements.push(import_statement_regex(module)?);
        }

        let mut import_lines = Vec::with_capacity(self.import_patterns.len());
        for pattern in &self.import_patterns {
            let anchored = format!(r"^[ \t]*(?:{})[ \t]*$", pattern);
            let regex = Regex::new(&anchored).map_err(|e| {
                TagstripError::InvalidRule(format!("import pattern '{}': {}", pattern, e))
            })?;
            import_lines.push(regex);
        }

        Ok(CompiledRule {
            namespace: self.namespace.clone(),
            opener: format!("<{}.", self.namespace),
            closer: format!("</{}.", self.namespace),
            replacement_tag: self.replacement_tag.clone(),
            wrapper_tags: self.wrapper_tags.clone(),
            import_modules: self.import_modules.clone(),
            import_statements,
            import_lines,
            closing_tags: self.closing_tags,
        })
    }
}

fn validate_tag_name(field: &str, tag: &str) -> Result<()> {
    if tag_name_regex().is_match(tag) {
        Ok(())
    } else {
        Err(TagstripError::InvalidRule(format!(
            "{} entry '{}' is not a tag name. Allowed characters: letters, numbers",
            field, tag
        )))
    }
}

/// Matches a whole import statement from `module`, including its line
/// terminator. Covers named, namespace, default, `import type` and
/// side-effect imports; named import lists may span lines.
fn import_statement_regex(module: &str) -> Result<Regex> {
    let module = regex::escape(module);
    let ident = r"[A-Za-z_$][\w$]*";
    let named = r"\{[^}]*\}";
    let star = format!(r"\*\s+as\s+{ident}");
    let clause = format!(
        r"(?:type\s+)?(?:{named}|{star}|{ident}(?:\s*,\s*(?:{named}|{star}))?)",
        named = named,
        star = star,
        ident = ident
    );
    let pattern = format!(
        r#"(?m)^[ \t]*import(?:\s+{clause}\s*from\s*|[ \t]*)["']{module}["'][ \t]*;?[ \t]*(?:\r?\n|\z)"#,
        clause = clause,
        module = module
    );

    Regex::new(&pattern)
        .map_err(|e| TagstripError::InvalidRule(format!("import module '{}': {}", module, e)))
}

/// A validated rule with its matchers built, ready for repeated use
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub(crate) namespace: String,
    pub(crate) opener: String,
    pub(crate) closer: String,
    pub(crate) replacement_tag: Option<String>,
    pub(crate) wrapper_tags: Vec<String>,
    pub(crate) import_modules: Vec<String>,
    pub(crate) import_statements: Vec<Regex>,
    pub(crate) import_lines: Vec<Regex>,
    pub(crate) closing_tags: ClosingTags,
}

impl CompiledRule {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn import_modules(&self) -> &[String] {
        &self.import_modules
    }

    /// Whether the buffer could contain anything this rule rewrites
    pub fn may_apply(&self, buffer: &str) -> bool {
        let qualified = &self.opener[1..];
        buffer.contains(qualified)
            || self.import_modules.iter().any(|m| buffer.contains(m.as_str()))
            || self.wrapper_tags.iter().any(|w| buffer.contains(w.as_str()))
            || !self.import_lines.is_empty()
    }
}
