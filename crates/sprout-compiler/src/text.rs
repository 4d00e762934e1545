//! Text run splitting.

/// One piece of a text node's markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextFragment {
    /// Characters sharing one style override
    Run {
        text: String,
        /// Key into the style override table (0 is the node's own style)
        style: usize,
        /// Position among the runs of the node
        index: usize,
        key: String,
    },
    /// A single newline
    LineBreak { key: String },
    /// The second newline of a blank line
    BlankLine { key: String },
}

/// Split `characters` into styled runs at every style change and newline.
///
/// `overrides` is indexed by UTF-16 code unit, as the design tool counts
/// positions; a character is styled by the entry at its first unit and
/// positions past the end use style 0. Keys use the same offsets. Empty
/// paragraphs produce no run.
pub fn split_runs(characters: &str, overrides: &[usize]) -> Vec<TextFragment> {
    let mut splitter = Splitter::default();
    let mut previous = None;
    let mut offset = 0;

    for ch in characters.chars() {
        let i = offset;
        offset += ch.len_utf16();
        let style = overrides.get(i).copied().unwrap_or(0);

        if ch == '\n' && previous == Some('\n') {
            splitter.fragments.push(TextFragment::BlankLine {
                key: format!("br{i}"),
            });
        } else if ch == '\n' {
            splitter.commit(i.to_string());
            splitter.fragments.push(TextFragment::LineBreak {
                key: format!("br{i}"),
            });
        } else {
            if style != splitter.style {
                splitter.commit(i.to_string());
                splitter.style = style;
            }
            splitter.paragraph.push(ch);
        }

        previous = Some(ch);
    }

    splitter.commit("end".to_string());
    splitter.fragments
}

#[derive(Default)]
struct Splitter {
    fragments: Vec<TextFragment>,
    paragraph: String,
    style: usize,
    runs: usize,
}

impl Splitter {
    fn commit(&mut self, key: String) {
        if self.paragraph.is_empty() {
            return;
        }
        self.fragments.push(TextFragment::Run {
            text: std::mem::take(&mut self.paragraph),
            style: self.style,
            index: self.runs,
            key,
        });
        self.runs += 1;
    }
}

/// Count of leading and trailing whitespace characters.
pub(crate) fn edge_whitespace(text: &str) -> (usize, usize) {
    let leading = text.chars().take_while(|c| c.is_whitespace()).count();
    let trailing = text.chars().rev().take_while(|c| c.is_whitespace()).count();
    (leading, trailing)
}

/// Escape text for a JSX template literal.
pub(crate) fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, style: usize, index: usize, key: &str) -> TextFragment {
        TextFragment::Run {
            text: text.into(),
            style,
            index,
            key: key.into(),
        }
    }

    #[test]
    fn test_plain_text_is_one_run() {
        assert_eq!(split_runs("Hello", &[]), vec![run("Hello", 0, 0, "end")]);
    }

    #[test]
    fn test_split_at_style_and_newline() {
        let fragments = split_runs("AB\nCD", &[0, 0, 0, 1, 1]);
        assert_eq!(
            fragments,
            vec![
                run("AB", 0, 0, "2"),
                TextFragment::LineBreak { key: "br2".into() },
                run("CD", 1, 1, "end"),
            ]
        );
    }

    #[test]
    fn test_style_change_mid_line() {
        let fragments = split_runs("abcd", &[0, 0, 2, 2]);
        assert_eq!(fragments, vec![run("ab", 0, 0, "2"), run("cd", 2, 1, "end")]);
    }

    #[test]
    fn test_overrides_count_utf16_units() {
        let fragments = split_runs("😀AB", &[0, 0, 1, 1]);
        assert_eq!(fragments, vec![run("😀", 0, 0, "2"), run("AB", 1, 1, "end")]);

        let fragments = split_runs("a😀\nb", &[0, 3, 3, 0, 3]);
        assert_eq!(
            fragments,
            vec![
                run("a", 0, 0, "1"),
                run("😀", 3, 1, "3"),
                TextFragment::LineBreak { key: "br3".into() },
                run("b", 3, 2, "end"),
            ]
        );
    }

    #[test]
    fn test_blank_line() {
        let fragments = split_runs("a\n\nb", &[]);
        assert_eq!(
            fragments,
            vec![
                run("a", 0, 0, "1"),
                TextFragment::LineBreak { key: "br1".into() },
                TextFragment::BlankLine { key: "br2".into() },
                run("b", 0, 1, "end"),
            ]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(split_runs("", &[]).is_empty());
    }

    #[test]
    fn test_edge_whitespace() {
        assert_eq!(edge_whitespace("  ab "), (2, 1));
        assert_eq!(edge_whitespace("ab"), (0, 0));
    }

    #[test]
    fn test_escape_template_literal() {
        assert_eq!(escape_template_literal("a`b${c}\\"), "a\\`b\\${c}\\\\");
    }
}
