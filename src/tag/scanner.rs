use std::ops::Range;

use super::{Tag, TagError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MarkKind {
    Ident,
    Required,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Mark {
    pub(super) kind: MarkKind,
    pub(super) range: Range<usize>,
}

/// Forward-only cursor over an annotation.
///
/// `start..pos` is the buffered text. Segments are recorded as marks over
/// the original string and only turned into a [`Tag`] by [`Scanner::imprint`].
pub(super) struct Scanner<'a> {
    text: &'a str,
    start: usize,
    pos: usize,
    marks: Vec<Mark>,
}

impl<'a> Scanner<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        Scanner { text, start: 0, pos: 0, marks: Vec::new() }
    }

    pub(super) fn scan(mut self) -> Result<Self, TagError> {
        loop {
            match self.peek() {
                None => {
                    self.mark(MarkKind::Ident);
                    break;
                }
                Some(b',') => {
                    self.mark(MarkKind::Ident);
                    self.bump();
                }
                Some(b'=') => {
                    let kind = match self.buffered() {
                        "required" => MarkKind::Required,
                        "default" => MarkKind::Default,
                        key => {
                            return Err(TagError::UnknownKey {
                                tag: self.text.to_string(),
                                key: key.to_string(),
                            })
                        }
                    };
                    self.bump();

                    if kind == MarkKind::Default {
                        // The default swallows the rest of the input, commas included.
                        self.pos = self.text.len();
                        self.mark_default();
                        break;
                    }

                    while !matches!(self.peek(), None | Some(b',')) {
                        self.adv();
                    }
                    self.mark(kind);
                    if self.peek().is_some() {
                        self.bump();
                    }
                }
                Some(_) => self.adv(),
            }
        }
        Ok(self)
    }

    #[cfg(test)]
    pub(super) fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub(super) fn imprint(&self, tag: &mut Tag) {
        for Mark { kind, range } in &self.marks {
            let v = &self.text[range.clone()];
            match kind {
                MarkKind::Ident => {
                    if tag.name.is_empty() {
                        tag.name = v.to_string();
                    } else {
                        tag.aliases.push(v.to_string());
                    }
                }
                MarkKind::Required => tag.required = v == "true",
                MarkKind::Default => tag.default = Some(v.to_string()),
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn adv(&mut self) {
        self.pos += 1;
    }

    /// Steps over the current byte and restarts the buffer after it.
    fn bump(&mut self) {
        self.pos += 1;
        self.start = self.pos;
    }

    fn buffered(&self) -> &'a str {
        &self.text[self.start..self.pos]
    }

    fn mark(&mut self, kind: MarkKind) {
        if self.pos > self.start {
            self.marks.push(Mark { kind, range: self.start..self.pos });
        }
        self.start = self.pos;
    }

    // Unlike other segments, an empty default (`default=`) is meaningful.
    fn mark_default(&mut self) {
        self.marks.push(Mark { kind: MarkKind::Default, range: self.start..self.pos });
        self.start = self.pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(text: &str) -> Vec<(MarkKind, &str)> {
        let scanner = Scanner::new(text).scan().unwrap();
        scanner.marks().iter().map(|it| (it.kind, &text[it.range.clone()])).collect()
    }

    #[test]
    fn marks_follow_encounter_order() {
        assert_eq!(
            marks("silent,s,required=true,default=a,b"),
            [
                (MarkKind::Ident, "silent"),
                (MarkKind::Ident, "s"),
                (MarkKind::Required, "true"),
                (MarkKind::Default, "a,b"),
            ]
        );
    }

    #[test]
    fn empty_segments_are_skipped() {
        assert_eq!(marks("a,,b,"), [(MarkKind::Ident, "a"), (MarkKind::Ident, "b")]);
        assert!(marks("").is_empty());
        assert!(marks("required=").is_empty());
    }

    #[test]
    fn empty_default_is_marked() {
        assert_eq!(marks("name,default="), [(MarkKind::Ident, "name"), (MarkKind::Default, "")]);
    }

    #[test]
    fn unknown_key() {
        let err = Scanner::new("name,short=s").scan().err().unwrap();
        assert_eq!(err.to_string(), "unknown key `short` in annotation `name,short=s`");
    }
}
