use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RE_STRONG_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<strong>(.*?)</strong>(.*)$").unwrap());
static RE_QUOTED_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"]*)"(.*)$"#).unwrap());
static RE_TRANSLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*-\s*"?(.*?)"?\s*$"#).unwrap());

/// Study panel shown next to a question.
///
/// Entries are kept as the formatted strings the renderer expects, e.g.
/// `<strong>let loose</strong> - "dam olmoq"` or `"Live in the moment." - "..."`.
/// The `*_pairs` accessors split them into [`StudyPair`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    pub title: String,
    pub sentence_starters: Vec<String>,
    pub phrases: Vec<String>,
    pub idioms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyPair {
    pub term: String,
    pub translation: Option<String>,
    /// The term was wrapped in `<strong>`.
    pub emphasized: bool,
}

impl Vocabulary {
    pub fn sentence_starter_pairs(&self) -> Vec<StudyPair> {
        self.sentence_starters.iter().map(|e| parse_entry(e)).collect()
    }

    pub fn phrase_pairs(&self) -> Vec<StudyPair> {
        self.phrases.iter().map(|e| parse_entry(e)).collect()
    }

    pub fn idiom_pairs(&self) -> Vec<StudyPair> {
        self.idioms.iter().map(|e| parse_entry(e)).collect()
    }

    pub fn all_pairs(&self) -> impl Iterator<Item = StudyPair> + '_ {
        self.sentence_starters
            .iter()
            .chain(&self.phrases)
            .chain(&self.idioms)
            .map(|e| parse_entry(e))
    }
}

/// Split one formatted entry into term and translation.
///
/// Anything that is neither a `<strong>` term nor a quoted term comes back
/// whole as the term, untranslated.
pub fn parse_entry(entry: &str) -> StudyPair {
    let entry = entry.trim();

    for (re, emphasized) in [(&*RE_STRONG_ENTRY, true), (&*RE_QUOTED_ENTRY, false)] {
        if let Some(caps) = re.captures(entry) {
            return StudyPair {
                term: caps[1].to_string(),
                translation: parse_translation(&caps[2]),
                emphasized,
            };
        }
    }

    StudyPair {
        term: entry.to_string(),
        translation: None,
        emphasized: false,
    }
}

fn parse_translation(rest: &str) -> Option<String> {
    RE_TRANSLATION
        .captures(rest)
        .map(|caps| caps[1].to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_term_with_translation() {
        let pair = parse_entry(r#"<strong>hang out</strong> - "vaqt o'tkazmoq""#);
        assert_eq!(pair.term, "hang out");
        assert_eq!(pair.translation.as_deref(), Some("vaqt o'tkazmoq"));
        assert!(pair.emphasized);
    }

    #[test]
    fn quoted_term_with_translation_containing_dash() {
        let pair = parse_entry(
            r#""A room without books is like a body without a soul." - "Kitobsiz xona - rухsiz tanga o'xshaydi.""#,
        );
        assert_eq!(pair.term, "A room without books is like a body without a soul.");
        assert_eq!(
            pair.translation.as_deref(),
            Some("Kitobsiz xona - rухsiz tanga o'xshaydi.")
        );
        assert!(!pair.emphasized);
    }

    #[test]
    fn standalone_proverb_has_no_translation() {
        let pair = parse_entry(r#""Life is a festival.""#);
        assert_eq!(pair.term, "Life is a festival.");
        assert_eq!(pair.translation, None);
    }

    #[test]
    fn unrecognized_entry_is_kept_whole() {
        let pair = parse_entry("just some words");
        assert_eq!(pair.term, "just some words");
        assert_eq!(pair.translation, None);
    }

    #[test]
    fn pairs_keep_order() {
        let vocabulary = Vocabulary {
            title: "Q5".to_string(),
            sentence_starters: vec![r#""Festivals offer..." - "Festivallar... taklif qiladi""#.to_string()],
            phrases: vec![
                r#"<strong>fresh air</strong> - "toza havo""#.to_string(),
                r#"<strong>hang out</strong> - "vaqt o'tkazmoq""#.to_string(),
            ],
            idioms: vec![r#""Life is a festival.""#.to_string()],
        };
        let terms: Vec<String> = vocabulary.phrase_pairs().into_iter().map(|p| p.term).collect();
        assert_eq!(terms, vec!["fresh air", "hang out"]);
        assert_eq!(vocabulary.sentence_starter_pairs()[0].term, "Festivals offer...");
        assert_eq!(vocabulary.all_pairs().count(), 4);
    }
}
