use crate::libspeaking::content::{ImageSet, QuestionRecord};
use crate::libspeaking::error::{Error, Lookup, Result};
use crate::libspeaking::validate::validate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

const EMBEDDED_CONTENT: &str = include_str!("../../data/speaking_test.json");

static SPEAKING_TEST: OnceLock<SpeakingTest> = OnceLock::new();

/// The whole test: the shared pictures and the ordered questions.
///
/// Only constructed through the loaders below, all of which validate, so a
/// `SpeakingTest` in hand always satisfies the numbering and required-field
/// rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakingTest {
    images: ImageSet,
    questions: Vec<QuestionRecord>,
}

#[derive(Deserialize)]
struct RawSpeakingTest {
    images: ImageSet,
    questions: Vec<QuestionRecord>,
}

/// The embedded content, parsed on first use and shared for the rest of the
/// process.
pub fn speaking_test() -> Result<&'static SpeakingTest> {
    if let Some(test) = SPEAKING_TEST.get() {
        return Ok(test);
    }
    let test = SpeakingTest::embedded()?;
    Ok(SPEAKING_TEST.get_or_init(|| test))
}

impl SpeakingTest {
    /// A fresh copy of the content compiled into the crate.
    pub fn embedded() -> Result<SpeakingTest> {
        Self::from_json_str(EMBEDDED_CONTENT)
    }

    pub fn from_json_str(json: &str) -> Result<SpeakingTest> {
        let now = Instant::now();
        let raw: RawSpeakingTest = serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                Error::malformed(e.to_string())
            } else {
                Error::Json(e)
            }
        })?;
        let test = SpeakingTest {
            images: raw.images,
            questions: raw.questions,
        };
        validate(&test)?;
        debug!(
            "[Load] Loaded {} questions in {} ms.",
            test.questions.len(),
            now.elapsed().as_millis()
        );
        Ok(test)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<SpeakingTest> {
        let path = path.as_ref();
        info!("[Load] Reading content from {:?}", path);
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question_by_number(&self, number: u32) -> Result<&QuestionRecord> {
        // numbering is validated to match position
        number
            .checked_sub(1)
            .and_then(|idx| self.questions.get(idx as usize))
            .ok_or(Error::NotFound {
                kind: Lookup::Question,
                key: number.into(),
            })
    }

    /// The shared pictures if `question` refers to them.
    pub fn images_for(&self, question: &QuestionRecord) -> Option<&ImageSet> {
        question.has_images.then_some(&self.images)
    }

    pub fn picture_questions(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.questions.iter().filter(|q| q.has_images)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_pretty()? + "\n")?;
        info!("[Load] Wrote {} questions to {:?}", self.len(), path);
        Ok(())
    }
}
