//! Content for the speaking mock test: eight exam prompts with sample answers
//! and bilingual vocabulary aids, plus a SQLite store for saved mocks.

pub mod libspeaking;

pub use libspeaking::content::{DebatePoints, ImageSet, QuestionRecord};
pub use libspeaking::error::{Error, Lookup, Result};
pub use libspeaking::markup::{annotate, AnnotatedText, Category, Span};
pub use libspeaking::table::{speaking_test, SpeakingTest};
pub use libspeaking::vocabulary::{StudyPair, Vocabulary};
