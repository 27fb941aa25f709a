//! The inline highlight convention used in sample answers.
//!
//! A highlighted span is written `<span class="ml-token CODE">TEXT</span>`
//! and paragraphs are separated with `<br><br>`. [`annotate`] turns that into
//! plain text plus byte ranges, and [`AnnotatedText::to_markup`] writes it back
//! out unchanged.

use crate::libspeaking::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

const SPAN_OPEN: &str = "<span class=\"ml-token ";
const SPAN_OPEN_END: &str = "\">";
const SPAN_CLOSE: &str = "</span>";
const BREAK: &str = "<br>";

static RE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="ml-token ([^"<>]*)">|</span>|<br>"#).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Adverb,
    Collocation,
    PhrasalVerb,
    Proverb,
    Idiom,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Adverb,
        Category::Collocation,
        Category::PhrasalVerb,
        Category::Proverb,
        Category::Idiom,
    ];

    /// The class name used in the markup.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Adverb => "adv",
            Category::Collocation => "colloc",
            Category::PhrasalVerb => "phrasal",
            Category::Proverb => "proverb",
            Category::Idiom => "idiom",
        }
    }

    pub fn from_code(code: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Adverb => "adverb",
            Category::Collocation => "collocation",
            Category::PhrasalVerb => "phrasal-verb",
            Category::Proverb => "proverb",
            Category::Idiom => "idiom",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Byte range into [`AnnotatedText::text`].
    pub range: Range<usize>,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotatedText {
    /// Text without tags; `<br>` becomes `\n`.
    pub text: String,
    /// Spans in order of appearance, never overlapping.
    pub spans: Vec<Span>,
}

impl AnnotatedText {
    pub fn span_text(&self, span: &Span) -> &str {
        &self.text[span.range.clone()]
    }

    pub fn spans_of(&self, category: Category) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(move |s| s.category == category)
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(self.text.len() + self.spans.len() * 40);
        let mut cursor = 0;
        for span in &self.spans {
            push_plain(&mut out, &self.text[cursor..span.range.start]);
            out.push_str(SPAN_OPEN);
            out.push_str(span.category.code());
            out.push_str(SPAN_OPEN_END);
            push_plain(&mut out, &self.text[span.range.clone()]);
            out.push_str(SPAN_CLOSE);
            cursor = span.range.end;
        }
        push_plain(&mut out, &self.text[cursor..]);
        out
    }
}

fn push_plain(out: &mut String, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str(BREAK);
        }
        out.push_str(line);
    }
}

/// Parse highlight markup. Unknown categories, nested spans, unclosed spans
/// and raw newlines are malformed content. Anything else, including a stray
/// `<`, is kept as text.
pub fn annotate(markup: &str) -> Result<AnnotatedText> {
    // `\n` in the text stands for `<br>` only
    if let Some(offset) = markup.find('\n') {
        return Err(Error::malformed(format!(
            "raw line break at offset {}, use <br>",
            offset
        )));
    }

    let mut text = String::with_capacity(markup.len());
    let mut spans = Vec::new();
    let mut open: Option<(usize, Category)> = None;
    let mut cursor = 0;

    for caps in RE_TOKEN.captures_iter(markup) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        text.push_str(&markup[cursor..token.start()]);
        cursor = token.end();

        if let Some(code) = caps.get(1) {
            let category = Category::from_code(code.as_str()).ok_or_else(|| {
                Error::malformed(format!("unknown highlight category `{}`", code.as_str()))
            })?;
            if let Some((start, _)) = open {
                return Err(Error::malformed(format!(
                    "highlight opened inside another highlight at offset {}",
                    start
                )));
            }
            open = Some((text.len(), category));
        } else if token.as_str() == SPAN_CLOSE {
            let (start, category) = open
                .take()
                .ok_or_else(|| Error::malformed("closing tag without an open highlight"))?;
            spans.push(Span {
                range: start..text.len(),
                category,
            });
        } else {
            text.push('\n');
        }
    }
    text.push_str(&markup[cursor..]);

    if let Some((start, category)) = open {
        return Err(Error::malformed(format!(
            "{} highlight at offset {} is never closed",
            category, start
        )));
    }

    Ok(AnnotatedText { text, spans })
}
