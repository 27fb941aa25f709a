use crate::libspeaking::error::Result;
use crate::libspeaking::markup::{annotate, AnnotatedText};
use crate::libspeaking::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};

/// The two pictures shared by the picture-description questions.
///
/// Keys on the wire are `img1`, `img2`, `img1Alt` and `img2Alt`; existing
/// renderers read those names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    #[serde(rename = "img1")]
    pub primary_image: String,
    #[serde(rename = "img2")]
    pub secondary_image: String,
    #[serde(rename = "img1Alt")]
    pub primary_image_caption: String,
    #[serde(rename = "img2Alt")]
    pub secondary_image_caption: String,
}

impl ImageSet {
    /// `(url, caption)` for both images, primary first.
    pub fn pairs(&self) -> [(&str, &str); 2] {
        [
            (
                self.primary_image.as_str(),
                self.primary_image_caption.as_str(),
            ),
            (
                self.secondary_image.as_str(),
                self.secondary_image_caption.as_str(),
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebatePoints {
    #[serde(rename = "for")]
    pub for_points: Vec<String>,
    pub against: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub number: u32,
    pub part: String,
    pub badge: String,
    pub prep_time: u32,
    pub speak_time: u32,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_instruction: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_images: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debate_points: Option<DebatePoints>,
    /// Answer text with `<span class="ml-token ...">` vocabulary markup.
    pub sample_answer: String,
    pub vocabulary: Vocabulary,
}

impl QuestionRecord {
    pub fn bullet_points(&self) -> &[String] {
        self.bullet_points.as_deref().unwrap_or_default()
    }

    pub fn debate_points(&self) -> Option<&DebatePoints> {
        self.debate_points.as_ref()
    }

    /// The sample answer split into plain text and highlighted spans.
    pub fn annotated_answer(&self) -> Result<AnnotatedText> {
        annotate(&self.sample_answer)
    }
}
