//! PII redaction engine
//!
//! Best-effort only: the pattern set catches common shapes of emails, phone
//! numbers, ID/card numbers and IPv4 addresses. It does not detect names,
//! postal addresses or anything written in words, and callers must not treat
//! the output as guaranteed free of personal data.

use std::fmt;

use regex::Regex;

/// Literal token that replaces every match.
pub const PLACEHOLDER: &str = "[REDACTED]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiiKind {
    Email,
    Phone,
    NationalId,
    DigitRun,
    Ipv4,
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PiiKind::Email => "EMAIL",
            PiiKind::Phone => "PHONE",
            PiiKind::NationalId => "NATIONAL_ID",
            PiiKind::DigitRun => "DIGIT_RUN",
            PiiKind::Ipv4 => "IPV4",
        };
        f.write_str(name)
    }
}

/// One removed substring, positioned by its byte offset in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    pub kind: PiiKind,
    pub original: String,
    pub offset: usize,
}

/// Pieces of the text being redacted. Source pieces borrow from the input.
enum Segment<'a> {
    Source { offset: usize, text: &'a str },
    Redacted,
}

/// Pattern-based PII redactor
pub struct Redactor {
    patterns: Vec<(PiiKind, Regex)>,
}

impl Redactor {
    pub fn new() -> Self {
        // Applied in this order; a later pattern only sees text earlier ones left.
        let table = [
            (
                PiiKind::Email,
                r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b",
            ),
            (
                PiiKind::Phone,
                r"(?:\+?\b1[-.\s]?)?(?:\(\d{3}\)\s?|\b\d{3}[-.\s]?)\d{3}[-.\s]?\d{4}\b",
            ),
            (PiiKind::NationalId, r"\b\d{3}[-.\s]?\d{2}[-.\s]?\d{4}\b"),
            (PiiKind::DigitRun, r"\b\d{10,}\b"),
            (PiiKind::Ipv4, r"\b\d{1,3}(?:\.\d{1,3}){3}\b"),
        ];

        let patterns = table
            .into_iter()
            .map(|(kind, pattern)| {
                let regex = Regex::new(pattern).expect("built-in PII pattern must compile");
                (kind, regex)
            })
            .collect();

        Self { patterns }
    }

    /// Redact PII from `text`.
    ///
    /// Returns the sanitized text and every removed substring, ordered by
    /// where it appeared in `text`. Duplicates are kept. Pattern passes are
    /// repeated until a full round finds nothing, so the result never matches
    /// any configured pattern.
    pub fn redact(&self, text: &str) -> (String, Vec<Redaction>) {
        let mut segments = vec![Segment::Source {
            offset: 0,
            text,
        }];
        let mut redactions = Vec::new();

        loop {
            let before = redactions.len();
            for (kind, pattern) in &self.patterns {
                segments = apply_pattern(*kind, pattern, segments, &mut redactions);
            }
            if redactions.len() == before {
                break;
            }
        }

        redactions.sort_by_key(|r| r.offset);

        let mut sanitized = String::with_capacity(text.len());
        for segment in &segments {
            match segment {
                Segment::Source { text, .. } => sanitized.push_str(text),
                Segment::Redacted => sanitized.push_str(PLACEHOLDER),
            }
        }

        (sanitized, redactions)
    }

    /// Whether any configured pattern matches `text`.
    pub fn contains_pii(&self, text: &str) -> bool {
        self.patterns.iter().any(|(_, pattern)| pattern.is_match(text))
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

/// One find/replace pass. No pattern can match across a placeholder (none
/// accepts `[` or `]`), so each source segment is searched on its own; the
/// brackets on either side behave like string edges for `\b`.
fn apply_pattern<'a>(
    kind: PiiKind,
    pattern: &Regex,
    segments: Vec<Segment<'a>>,
    redactions: &mut Vec<Redaction>,
) -> Vec<Segment<'a>> {
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        let (offset, text) = match segment {
            Segment::Source { offset, text } => (offset, text),
            Segment::Redacted => {
                out.push(Segment::Redacted);
                continue;
            }
        };

        let mut last = 0;
        for m in pattern.find_iter(text) {
            if m.as_str().is_empty() {
                continue;
            }
            if m.start() > last {
                out.push(Segment::Source {
                    offset: offset + last,
                    text: &text[last..m.start()],
                });
            }
            out.push(Segment::Redacted);
            redactions.push(Redaction {
                kind,
                original: m.as_str().to_string(),
                offset: offset + m.start(),
            });
            last = m.end();
        }

        if last < text.len() {
            out.push(Segment::Source {
                offset: offset + last,
                text: &text[last..],
            });
        }
    }

    out
}
