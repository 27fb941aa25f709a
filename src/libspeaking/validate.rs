use crate::libspeaking::content::QuestionRecord;
use crate::libspeaking::error::{Error, Result};
use crate::libspeaking::table::SpeakingTest;
use log::debug;

macro_rules! require_non_empty {
    ($question:expr, $value:expr, $field:literal) => {
        if $value.trim().is_empty() {
            return Err(Error::malformed(format!(
                "question {} has an empty `{}`",
                $question.number, $field
            )));
        }
    };
}

/// Load-time checks for a content table.
pub fn validate(test: &SpeakingTest) -> Result<()> {
    if test.questions().is_empty() {
        return Err(Error::malformed("content has no questions"));
    }
    check_numbering(test.questions())?;
    for question in test.questions() {
        check_question(question)?;
    }
    if test.questions().iter().any(|q| q.has_images) {
        check_images(test)?;
    }
    Ok(())
}

/// Numbers must run 1, 2, 3... in array order.
fn check_numbering(questions: &[QuestionRecord]) -> Result<()> {
    for (idx, question) in questions.iter().enumerate() {
        let expected = idx as u32 + 1;
        if question.number == expected {
            continue;
        }
        let first = questions.iter().position(|q| q.number == question.number);
        return Err(Error::malformed(match first {
            Some(first) if first < idx => format!(
                "question number {} appears more than once (positions {} and {})",
                question.number,
                first + 1,
                idx + 1
            ),
            _ => format!(
                "question at position {} has number {}, expected {}",
                idx + 1,
                question.number,
                expected
            ),
        }));
    }
    Ok(())
}

fn check_question(question: &QuestionRecord) -> Result<()> {
    require_non_empty!(question, question.prompt, "prompt");
    require_non_empty!(question, question.sample_answer, "sampleAnswer");
    require_non_empty!(question, question.vocabulary.title, "vocabulary.title");

    let vocabulary = &question.vocabulary;
    for (field, entries) in [
        ("vocabulary.sentenceStarters", &vocabulary.sentence_starters),
        ("vocabulary.phrases", &vocabulary.phrases),
        ("vocabulary.idioms", &vocabulary.idioms),
    ] {
        if entries.is_empty() {
            return Err(Error::malformed(format!(
                "question {} has no entries in `{}`",
                question.number, field
            )));
        }
    }

    question.annotated_answer().map_err(|e| match e {
        Error::MalformedContent(msg) => Error::malformed(format!(
            "question {} sampleAnswer: {}",
            question.number, msg
        )),
        other => other,
    })?;

    let unmatched = unmatched_highlights(question);
    if !unmatched.is_empty() {
        debug!(
            "[Load] Question {} highlights without a vocabulary entry: {:?}",
            question.number, unmatched
        );
    }
    Ok(())
}

fn check_images(test: &SpeakingTest) -> Result<()> {
    for (url, caption) in test.images().pairs() {
        if url.trim().is_empty() || caption.trim().is_empty() {
            return Err(Error::malformed(
                "picture questions need both images with captions",
            ));
        }
    }
    Ok(())
}

/// Highlighted spans in the sample answer whose text does not show up in any
/// of the question's vocabulary entries. Authoring aid only; never an error.
pub fn unmatched_highlights(question: &QuestionRecord) -> Vec<String> {
    let Ok(annotated) = question.annotated_answer() else {
        return Vec::new();
    };
    let terms: Vec<String> = question
        .vocabulary
        .all_pairs()
        .map(|p| normalize(&p.term))
        .filter(|t| !t.is_empty())
        .collect();

    annotated
        .spans
        .iter()
        .map(|span| annotated.span_text(span))
        .filter(|text| {
            let needle = normalize(text);
            !needle.is_empty()
                && !terms
                    .iter()
                    .any(|term| term.contains(&needle) || needle.contains(term.as_str()))
        })
        .map(str::to_string)
        .collect()
}

fn normalize(text: &str) -> String {
    text.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libspeaking::vocabulary::Vocabulary;

    fn question(number: u32) -> QuestionRecord {
        QuestionRecord {
            number,
            part: "Part 1".to_string(),
            badge: "30s".to_string(),
            prep_time: 5,
            speak_time: 30,
            prompt: "Where do you usually buy your clothes?".to_string(),
            prompt_instruction: None,
            has_images: false,
            bullet_points: None,
            debate_points: None,
            sample_answer: "I <span class=\"ml-token phrasal\">browse through</span> \
                            <span class=\"ml-token colloc\">high-street stores</span>."
                .to_string(),
            vocabulary: Vocabulary {
                title: "Q3".to_string(),
                sentence_starters: vec![r#""I mostly buy from..." - "Asosan...""#.to_string()],
                phrases: vec![r#"<strong>browse through</strong> - "ko'rib chiqmoq""#.to_string()],
                idioms: vec![r#""Clothes make the man.""#.to_string()],
            },
        }
    }

    #[test]
    fn contiguous_numbering_passes() {
        assert!(check_numbering(&[question(1), question(2), question(3)]).is_ok());
        assert!(check_numbering(&[]).is_ok());
    }

    #[test]
    fn duplicate_number_is_reported() {
        let err = check_numbering(&[question(1), question(1)]).unwrap_err();
        assert!(matches!(err, Error::MalformedContent(ref m) if m.contains("more than once")));
    }

    #[test]
    fn gap_is_reported() {
        let err = check_numbering(&[question(1), question(3)]).unwrap_err();
        assert!(matches!(err, Error::MalformedContent(ref m) if m.contains("expected 2")));
    }

    #[test]
    fn zero_based_numbering_is_rejected() {
        assert!(check_numbering(&[question(0), question(1)]).is_err());
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let mut q = question(1);
        q.prompt = "  ".to_string();
        let err = check_question(&q).unwrap_err();
        assert!(matches!(err, Error::MalformedContent(ref m) if m.contains("`prompt`")));
    }

    #[test]
    fn empty_idioms_are_rejected() {
        let mut q = question(1);
        q.vocabulary.idioms.clear();
        let err = check_question(&q).unwrap_err();
        assert!(matches!(err, Error::MalformedContent(ref m) if m.contains("vocabulary.idioms")));
    }

    #[test]
    fn broken_markup_names_the_question() {
        let mut q = question(6);
        q.sample_answer = "<span class=\"ml-token adv\">often".to_string();
        let err = check_question(&q).unwrap_err();
        assert!(matches!(err, Error::MalformedContent(ref m) if m.starts_with("question 6 sampleAnswer")));
    }

    #[test]
    fn unmatched_highlights_lists_missing_terms() {
        let q = question(3);
        assert_eq!(unmatched_highlights(&q), vec!["high-street stores".to_string()]);
    }
}
