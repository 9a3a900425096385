//! Single-pass structural classification of Markdown lines
//!
//! Every line gets exactly one role. The state machine keeps one unit of
//! lookback (the previous line's role) plus a fenced-code flag; that is
//! enough to handle lazy quote/list continuation, table runs, and
//! indentation-based code blocks without building an AST.

use regex::Regex;

/// Structural role of one Markdown line.
///
/// `Meta` is never produced by classification; it is stamped by the caller
/// on front-matter lines before the state machine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Heading,
    Quote,
    List,
    CodeBlock,
    HorizontalRule,
    Table,
    Blank,
    Paragraph,
    Meta,
}

/// One line of a document plus its role. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub text: String,
    pub role: LineRole,
}

struct Classifier {
    heading_re: Regex,
    list_re: Regex,
    quote_re: Regex,
    table_re: Regex,
    in_fence: bool,
    prev: Option<LineRole>,
}

impl Classifier {
    fn new() -> Self {
        Self {
            heading_re: Regex::new(r"^\s*#{1,6} ").unwrap(),
            list_re: Regex::new(r"^\s*([-*+]|\d+[.)])\s+").unwrap(),
            quote_re: Regex::new(r"^\s*>\s+").unwrap(),
            table_re: Regex::new(r"^[\s:-]*\|").unwrap(),
            in_fence: false,
            prev: None,
        }
    }

    fn classify(&mut self, line: &str) -> LineRole {
        let role = self.discriminate(line);
        self.prev = Some(role);
        role
    }

    fn discriminate(&mut self, line: &str) -> LineRole {
        let trimmed = line.trim();

        if self.in_fence {
            if trimmed.starts_with("```") {
                self.in_fence = false;
            }
            return LineRole::CodeBlock;
        }
        if trimmed.starts_with("```") {
            self.in_fence = true;
            return LineRole::CodeBlock;
        }

        if trimmed.is_empty() {
            // Also ends any table run and breaks quote/list continuation,
            // simply by becoming the remembered previous role.
            return LineRole::Blank;
        }

        if self.heading_re.is_match(line) {
            return LineRole::Heading;
        }
        if self.list_re.is_match(line) {
            return LineRole::List;
        }
        if self.quote_re.is_match(line) {
            return LineRole::Quote;
        }
        if trimmed.len() >= 3 && trimmed.chars().all(|c| "-*_=".contains(c)) {
            return LineRole::HorizontalRule;
        }
        if self.table_re.is_match(line)
            || (self.prev == Some(LineRole::Table) && line.contains('|'))
        {
            return LineRole::Table;
        }

        // Indentation-based code: no fence line required to enter or leave.
        // List continuation indentation shields the line from this rule.
        if line.starts_with("    ") || line.starts_with('\t') {
            return if self.prev == Some(LineRole::List) {
                LineRole::List
            } else {
                LineRole::CodeBlock
            };
        }

        // Plain text lazily continues a quote or list started above.
        match self.prev {
            Some(LineRole::Quote) => LineRole::Quote,
            Some(LineRole::List) => LineRole::List,
            _ => LineRole::Paragraph,
        }
    }
}

/// Classify a document's lines, one role per line, in input order.
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ClassifiedLine> {
    classify_lines_with_meta(lines, 0)
}

/// Like [`classify_lines`], but the first `meta_lines` entries are stamped
/// [`LineRole::Meta`] (front-matter or document metadata identified by the
/// caller). The state machine starts fresh after them.
pub fn classify_lines_with_meta<S: AsRef<str>>(lines: &[S], meta_lines: usize) -> Vec<ClassifiedLine> {
    let mut classifier = Classifier::new();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let text = line.as_ref().to_string();
            let role = if i < meta_lines {
                LineRole::Meta
            } else {
                classifier.classify(line.as_ref())
            };
            ClassifiedLine { text, role }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use LineRole::*;

    fn roles(md: &str) -> Vec<LineRole> {
        let lines: Vec<&str> = md.lines().collect();
        classify_lines(&lines).iter().map(|l| l.role).collect()
    }

    #[test]
    fn test_headings() {
        let md = "# header\n## header\n### header\n#### header\n##### header\n###### header\nparagraph";
        assert_eq!(
            roles(md),
            vec![Heading, Heading, Heading, Heading, Heading, Heading, Paragraph]
        );
    }

    #[test]
    fn test_heading_after_each_block() {
        let md = "\
paragraph
# header

> blockquote
# header

* list
# header

    code block
# header

```
fenced code block
```
# header

___
# header

|h|
|-|
|c|
# header";
        assert_eq!(
            roles(md),
            vec![
                Paragraph, Heading, Blank,
                Quote, Heading, Blank,
                List, Heading, Blank,
                CodeBlock, Heading, Blank,
                CodeBlock, CodeBlock, CodeBlock, Heading, Blank,
                HorizontalRule, Heading, Blank,
                Table, Table, Table, Heading,
            ]
        );
    }

    #[test]
    fn test_quote_continuation() {
        let md = "> quote\n> quote\nquote\n\n> quote\n  quote\n\n> quote";
        assert_eq!(
            roles(md),
            vec![Quote, Quote, Quote, Blank, Quote, Quote, Blank, Quote]
        );
    }

    #[test]
    fn test_quote_after_each_block() {
        let md = "\
# header
> quote

paragraph
> quote

* list
> quote

    code block
> quote

```
fenced code block
```
> quote

___
> quote

|h|
|-|
|c|
> quote";
        assert_eq!(
            roles(md),
            vec![
                Heading, Quote, Blank,
                Paragraph, Quote, Blank,
                List, Quote, Blank,
                CodeBlock, Quote, Blank,
                CodeBlock, CodeBlock, CodeBlock, Quote, Blank,
                HorizontalRule, Quote, Blank,
                Table, Table, Table, Quote,
            ]
        );
    }

    #[test]
    fn test_paragraphs() {
        let md = "paragraph\nparagraph\n\nparagraph";
        assert_eq!(roles(md), vec![Paragraph, Paragraph, Blank, Paragraph]);
    }

    #[test]
    fn test_paragraph_after_each_block() {
        let md = "\
# header
paragraph

> quote

paragraph

* list

paragraph

    code block
paragraph

```
fenced code block
```
paragraph

___
paragraph

|h|
|-|
|c|
paragraph";
        assert_eq!(
            roles(md),
            vec![
                Heading, Paragraph, Blank,
                Quote, Blank, Paragraph, Blank,
                List, Blank, Paragraph, Blank,
                CodeBlock, Paragraph, Blank,
                CodeBlock, CodeBlock, CodeBlock, Paragraph, Blank,
                HorizontalRule, Paragraph, Blank,
                Table, Table, Table, Paragraph,
            ]
        );
    }

    #[test]
    fn test_list_nesting_and_continuation() {
        let md = "\
* list
* list
list
* list
  list
    - list
    - list
      list

* list";
        assert_eq!(
            roles(md),
            vec![List, List, List, List, List, List, List, List, Blank, List]
        );
    }

    #[test]
    fn test_list_after_each_block() {
        let md = "\
# header
* list

paragraph
* list

> blockquote
* list

    code block
* list

```
fenced code block
```
* list

___
* list

|h|
|-|
|c|
* list";
        assert_eq!(
            roles(md),
            vec![
                Heading, List, Blank,
                Paragraph, List, Blank,
                Quote, List, Blank,
                CodeBlock, List, Blank,
                CodeBlock, CodeBlock, CodeBlock, List, Blank,
                HorizontalRule, List, Blank,
                Table, Table, Table, List,
            ]
        );
    }

    #[test]
    fn test_fence_swallows_markup() {
        let md = "```\n# not a heading\n* not a list\n```";
        assert_eq!(roles(md), vec![CodeBlock, CodeBlock, CodeBlock, CodeBlock]);
    }

    #[test]
    fn test_ordered_and_checkbox_lists() {
        let md = "1. first\n2) second\n- [ ] open task\n- [x] done task";
        assert_eq!(roles(md), vec![List, List, List, List]);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let md = "# h\ntext\n\n> q\n* l\n    code";
        let lines: Vec<&str> = md.lines().collect();
        let first = classify_lines(&lines);
        let texts: Vec<&str> = first.iter().map(|l| l.text.as_str()).collect();
        let second = classify_lines(&texts);
        assert_eq!(first, second);
    }

    #[test]
    fn test_meta_lines_are_stamped_not_derived() {
        let lines = vec!["---", "title: x", "---", "# h"];
        let classified = classify_lines_with_meta(&lines, 3);
        assert_eq!(classified[0].role, Meta);
        assert_eq!(classified[1].role, Meta);
        assert_eq!(classified[2].role, Meta);
        assert_eq!(classified[3].role, Heading);

        // Without the caller's stamp the same lines classify structurally.
        let plain = classify_lines(&lines);
        assert_eq!(plain[0].role, HorizontalRule);
    }
}
