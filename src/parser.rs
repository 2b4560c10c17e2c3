use std::collections::HashMap;
use std::mem;
use std::str::Lines;

use crate::DEFAULT_SECTION;
use crate::error::FormatError;
use crate::section::Section;

/// Represents an on-going parse over text that has already had its spaces removed.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Lines<'a>,
}

/// What a single line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Comment,
    Header(&'a str),
    Entry { key: &'a str, value: &'a str },
    Ignored,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            // `lines` also drops a trailing '\r', so CRLF files behave like LF files.
            lines: text.lines(),
        }
    }
}

impl Parser<'_> {
    /// Consumes every line and returns the sections keyed by name. The default section is
    /// always present.
    pub fn into_sections(self) -> Result<HashMap<String, Section>, FormatError> {
        let mut sections = HashMap::<String, Section>::with_capacity(16);
        let mut current = Section::new(DEFAULT_SECTION.to_owned());

        for line in self.lines {
            match classify(line) {
                Line::Comment | Line::Ignored => log::trace!("skipping line {line:?}"),
                Line::Header(header) => {
                    let name = header.trim_matches(['[', ']']);

                    if name.is_empty() {
                        return Err(FormatError::SectionNameEmpty);
                    }

                    // Only the section directly above is checked. Reopening an earlier name
                    // later in the file replaces that section wholesale.
                    if name == current.name() {
                        return Err(FormatError::RepeatSectionName {
                            name: name.to_owned(),
                        });
                    }

                    let previous = mem::replace(&mut current, Section::new(name.to_owned()));
                    sections.insert(previous.name().to_owned(), previous);

                    if sections.contains_key(name) {
                        log::debug!("section {name:?} reopened, earlier entries are discarded");
                    }
                }
                Line::Entry { key, value } => current.insert(key, value)?,
            }
        }

        sections.insert(current.name().to_owned(), current);

        Ok(sections)
    }
}

fn classify(line: &str) -> Line<'_> {
    if line.starts_with('#') {
        return Line::Comment;
    }

    if line.starts_with('[') && line.ends_with(']') {
        return Line::Header(line);
    }

    match line.split_once('=') {
        Some((key, value)) if is_assignment(line) => Line::Entry { key, value },
        _ => Line::Ignored,
    }
}

/// An assignment needs some `=` with at least one character on either side. That `=` need not
/// be the first one, which is where the line is actually split.
fn is_assignment(line: &str) -> bool {
    line.match_indices('=').any(|(i, _)| i > 0 && i + 1 < line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<HashMap<String, Section>, FormatError> {
        Parser::new(text).into_sections()
    }

    #[test]
    fn classify_lines() {
        assert_eq!(classify("#ip=127.0.0.1"), Line::Comment);
        assert_eq!(classify("[broker]"), Line::Header("[broker]"));
        assert_eq!(
            classify("ip=127.0.0.1"),
            Line::Entry {
                key: "ip",
                value: "127.0.0.1"
            }
        );
        assert_eq!(classify(""), Line::Ignored);
        assert_eq!(classify("ip="), Line::Ignored);
        assert_eq!(classify("=127.0.0.1"), Line::Ignored);
        assert_eq!(classify("[broker"), Line::Ignored);
        assert_eq!(classify("stray"), Line::Ignored);
    }

    #[test]
    fn split_at_first_equal() {
        assert_eq!(
            classify("url=a=b=c"),
            Line::Entry {
                key: "url",
                value: "a=b=c"
            }
        );
        // Shaped like an assignment thanks to the later '=', but split at the first one.
        assert_eq!(
            classify("=a=b"),
            Line::Entry {
                key: "",
                value: "a=b"
            }
        );
    }

    #[test]
    fn default_section_always_present() {
        let sections = parse("#nothing\n").expect("expected comment-only text to parse");

        assert_eq!(sections.len(), 1);
        assert!(sections[DEFAULT_SECTION].is_empty());
    }

    #[test]
    fn entries_go_to_current_section() {
        let text = "ip=127.0.0.1\n[broker]\nlisten_port=7777\n[logger]\nlisten_port=1888\n";
        let sections = parse(text).expect("expected hardcoded text to parse");

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[DEFAULT_SECTION].get("ip"), Some("127.0.0.1"));
        assert_eq!(sections["broker"].get("listen_port"), Some("7777"));
        assert_eq!(sections["logger"].get("listen_port"), Some("1888"));
        assert_eq!(sections["logger"].name(), "logger");
    }

    #[test]
    fn nested_brackets_are_trimmed() {
        let sections = parse("[[broker]]\ntime=10\n").expect("expected hardcoded text to parse");

        assert_eq!(sections["broker"].get("time"), Some("10"));
    }

    #[test]
    fn empty_section_name() {
        assert_eq!(parse("[]\n"), Err(FormatError::SectionNameEmpty));
        assert_eq!(parse("a=1\n[[]]\n"), Err(FormatError::SectionNameEmpty));
    }

    #[test]
    fn adjacent_repeat_section() {
        let result = parse("[a]\nx=1\n#between\n[a]\n");

        assert_eq!(
            result,
            Err(FormatError::RepeatSectionName {
                name: "a".to_owned()
            })
        );
    }

    #[test]
    fn reopened_section_replaces_earlier() {
        let sections =
            parse("[a]\nx=1\n[b]\ny=2\n[a]\nz=3\n").expect("expected reopened section to parse");

        assert_eq!(sections.len(), 3);
        assert_eq!(sections["a"].get("x"), None);
        assert_eq!(sections["a"].get("z"), Some("3"));
        assert_eq!(sections["b"].get("y"), Some("2"));
    }

    #[test]
    fn duplicate_key_in_section() {
        let result = parse("[broker]\ntime=10\ntime=20\n");

        assert_eq!(
            result,
            Err(FormatError::KeyAlreadyExists {
                section: "broker".to_owned(),
                key: "time".to_owned(),
            })
        );
    }

    #[test]
    fn same_key_in_different_sections() {
        let sections =
            parse("port=1\n[broker]\nport=2\n").expect("expected hardcoded text to parse");

        assert_eq!(sections[DEFAULT_SECTION].get("port"), Some("1"));
        assert_eq!(sections["broker"].get("port"), Some("2"));
    }

    #[test]
    fn crlf_line_endings() {
        let sections = parse("[broker]\r\ntime=10\r\n").expect("expected CRLF text to parse");

        assert_eq!(sections["broker"].get("time"), Some("10"));
    }
}
