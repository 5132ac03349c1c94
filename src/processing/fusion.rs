use crate::domain::decision::Decision;
use crate::domain::item::Candidate;
use crate::domain::profile::ReferenceProfile;
use crate::processing::text::score_text;
use crate::processing::visual::{VisualClassifier, VisualSample, score_visual};
use crate::{DEFAULT_MAX_DURATION, DEFAULT_VISUAL_WEIGHT, SIMILARITY_THRESHOLD};

/// Tunables of the decision engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchSettings {
    /// A fused score must be strictly above this value to be accepted.
    pub threshold: f64,
    /// Share of the visual score in the fused score when one is available.
    pub visual_weight: f64,
    /// Longest accepted duration in seconds.
    pub max_duration: u32,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            threshold: SIMILARITY_THRESHOLD,
            visual_weight: DEFAULT_VISUAL_WEIGHT,
            max_duration: DEFAULT_MAX_DURATION,
        }
    }
}

/// Fuses text and visual similarity. Without a visual score the text score
/// is returned unchanged.
pub fn fuse(text_score: f64, visual_score: Option<f32>, visual_weight: f64) -> f64 {
    match visual_score {
        Some(visual) => (1.0 - visual_weight) * text_score + visual_weight * f64::from(visual),
        None => text_score,
    }
}

/// Accepts when the fused score is strictly above the threshold.
pub fn decide(text_score: f64, visual_score: Option<f32>, settings: &MatchSettings) -> bool {
    fuse(text_score, visual_score, settings.visual_weight) > settings.threshold
}

/// Immutable state shared by every candidate evaluation of a run.
pub struct MatchContext {
    profile: ReferenceProfile,
    classifier: Option<Box<dyn VisualClassifier>>,
    settings: MatchSettings,
}

impl MatchContext {
    /// A `max_duration` learned with the profile takes precedence over the
    /// configured one.
    pub fn new(
        profile: ReferenceProfile,
        classifier: Option<Box<dyn VisualClassifier>>,
        mut settings: MatchSettings,
    ) -> Self {
        if let Some(max_duration) = profile.max_duration() {
            settings.max_duration = max_duration;
        }
        Self {
            profile,
            classifier,
            settings,
        }
    }

    pub fn profile(&self) -> &ReferenceProfile {
        &self.profile
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn is_too_long(&self, duration: Option<u32>) -> bool {
        duration.is_some_and(|seconds| seconds > self.settings.max_duration)
    }

    /// Whether fetching the thumbnail of `candidate` can affect its decision.
    pub fn wants_thumbnail(&self, candidate: &Candidate) -> bool {
        self.has_classifier()
            && candidate.thumbnail.is_some()
            && !self.is_too_long(candidate.duration)
    }

    /// Runs `duration-check -> text-score -> visual-score -> fuse -> decide`
    /// for one candidate.
    pub fn evaluate(&self, candidate: &Candidate, sample: Option<&VisualSample>) -> Decision {
        if let Some(duration) = candidate.duration
            && self.is_too_long(Some(duration))
        {
            return Decision::TooLong {
                duration,
                max_duration: self.settings.max_duration,
            };
        }

        let text = score_text(&candidate.fields, &self.profile);
        let visual = score_visual(self.classifier.as_deref(), sample);
        let score = fuse(text.score, visual, self.settings.visual_weight);

        log::debug!(
            "Scored candidate {:?}: text={:.3} ({:?}), visual={visual:?}, fused={score:.3}",
            candidate.video_url,
            text.score,
            text.fields,
        );

        if decide(text.score, visual, &self.settings) {
            Decision::Accepted { score }
        } else {
            Decision::Rejected { score }
        }
    }
}
