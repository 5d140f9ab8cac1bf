//! Text segmentation for the reveal animation.
//!
//! Text is cut into alternating runs of whitespace and non-whitespace. The char
//! segmentation goes one level deeper and splits each word into grapheme
//! clusters, kept inside a word group so the renderer can treat the whole word
//! as one unbreakable box (a word never wraps halfway through its reveal).

use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordSpan<'a> {
    Word(&'a str),
    Space(&'a str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CharSpan<'a> {
    /// One entry per grapheme of the word; rendered as an atomic wrapper.
    Word(Vec<&'a str>),
    Space(&'a str),
}

impl WordSpan<'_> {
    pub fn text(&self) -> &str {
        match self {
            WordSpan::Word(s) | WordSpan::Space(s) => s,
        }
    }
}

impl CharSpan<'_> {
    /// Number of animated characters (whitespace runs are not animated).
    pub fn char_count(&self) -> usize {
        match self {
            CharSpan::Word(chars) => chars.len(),
            CharSpan::Space(_) => 0,
        }
    }
}

// --- Tokenizer --------------------------------------------------------------

/// Split into maximal runs; `true` marks a whitespace run.
fn runs(text: &str) -> Vec<(bool, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (idx, c) in text.char_indices() {
        let ws = c.is_whitespace();
        match in_space {
            Some(prev) if prev != ws => {
                out.push((prev, &text[start..idx]));
                start = idx;
            }
            _ => {}
        }
        in_space = Some(ws);
    }
    if let Some(ws) = in_space {
        out.push((ws, &text[start..]));
    }
    out
}

pub fn segment_by_word(text: &str) -> Vec<WordSpan<'_>> {
    runs(text)
        .into_iter()
        .map(|(ws, s)| if ws { WordSpan::Space(s) } else { WordSpan::Word(s) })
        .collect()
}

pub fn segment_by_char(text: &str) -> Vec<CharSpan<'_>> {
    runs(text)
        .into_iter()
        .map(|(ws, s)| {
            if ws {
                CharSpan::Space(s)
            } else {
                CharSpan::Word(s.graphemes(true).collect())
            }
        })
        .collect()
}

/// Concatenated text of a char segmentation.
pub fn char_text(spans: &[CharSpan<'_>]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            CharSpan::Word(chars) => chars.iter().for_each(|c| out.push_str(c)),
            CharSpan::Space(s) => out.push_str(s),
        }
    }
    out
}

pub fn char_count(spans: &[CharSpan<'_>]) -> usize {
    spans.iter().map(CharSpan::char_count).sum()
}

// --- Markup -----------------------------------------------------------------

fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

fn push_span(out: &mut String, class: &str, text: &str) {
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push_str("\">");
    push_escaped(out, text);
    out.push_str("</span>");
}

pub fn word_markup(spans: &[WordSpan<'_>]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            WordSpan::Word(s) => push_span(&mut out, "word", s),
            WordSpan::Space(s) => push_span(&mut out, "word-space", s),
        }
    }
    out
}

/// Markup whose `.char` elements appear in reveal order.
pub fn char_markup(spans: &[CharSpan<'_>]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            CharSpan::Word(chars) => {
                out.push_str("<span class=\"word-wrapper\">");
                for c in chars {
                    push_span(&mut out, "char", c);
                }
                out.push_str("</span>");
            }
            CharSpan::Space(s) => push_span(&mut out, "char-space", s),
        }
    }
    out
}
