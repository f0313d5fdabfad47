//! Leftover references after a rewrite

use crate::domain::rule::CompiledRule;
use serde::Serialize;

const MAX_EXCERPT_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualKind {
    /// `<ns.` or `</ns.` still present on the line
    QualifiedTag,
    /// A quoted specifier of an import module (import or require left behind)
    ModuleReference,
}

/// A line that still refers to the stripped namespace or its module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Residual {
    pub line: usize,
    pub kind: ResidualKind,
    pub excerpt: String,
}

/// Find lines still mentioning the rule's namespace tags or import modules.
///
/// A line matching both is reported once, as a qualified tag.
pub fn find_residuals(buffer: &str, rule: &CompiledRule) -> Vec<Residual> {
    let quoted_modules: Vec<[String; 2]> = rule
        .import_modules
        .iter()
        .map(|m| [format!("\"{}\"", m), format!("'{}'", m)])
        .collect();

    let mut residuals = Vec::new();
    for (idx, line) in buffer.lines().enumerate() {
        let kind = if line.contains(rule.opener.as_str()) || line.contains(rule.closer.as_str()) {
            ResidualKind::QualifiedTag
        } else if quoted_modules
            .iter()
            .flatten()
            .any(|quoted| line.contains(quoted.as_str()))
        {
            ResidualKind::ModuleReference
        } else {
            continue;
        };

        residuals.push(Residual {
            line: idx + 1,
            kind,
            excerpt: excerpt(line),
        });
    }

    residuals
}

fn excerpt(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.chars().count() <= MAX_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    trimmed.chars().take(MAX_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::RewriteRule;

    fn rule() -> CompiledRule {
        RewriteRule::framer_motion().compile().unwrap()
    }

    #[test]
    fn test_no_residuals_in_clean_buffer() {
        let input = "import { cn } from \"@/lib/utils\";\n<div>motion sickness</div>\n";
        assert!(find_residuals(input, &rule()).is_empty());
    }

    #[test]
    fn test_reports_tags_and_modules() {
        let input = "const m = require('framer-motion');\nok\n  <motion.div a={\n</motion.div>\n";
        let residuals = find_residuals(input, &rule());
        assert_eq!(
            residuals,
            vec![
                Residual {
                    line: 1,
                    kind: ResidualKind::ModuleReference,
                    excerpt: "const m = require('framer-motion');".to_string(),
                },
                Residual {
                    line: 3,
                    kind: ResidualKind::QualifiedTag,
                    excerpt: "<motion.div a={".to_string(),
                },
                Residual {
                    line: 4,
                    kind: ResidualKind::QualifiedTag,
                    excerpt: "</motion.div>".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_unquoted_module_name_is_not_a_reference() {
        let input = "// migrated away from framer-motion\n";
        assert!(find_residuals(input, &rule()).is_empty());
    }

    #[test]
    fn test_excerpt_is_truncated() {
        let long = format!("<motion.div {}>", "a".repeat(200));
        let residuals = find_residuals(&long, &rule());
        assert_eq!(residuals.len(), 1);
        assert_eq!(residuals[0].excerpt.chars().count(), MAX_EXCERPT_CHARS);
    }
}
