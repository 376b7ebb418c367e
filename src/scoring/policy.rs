use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{PaintMaskError, PaintMaskResult},
    painting::history::Painting,
    similarity::scorer::SimilarityScorer,
};

/// Point budget of a round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Points awarded for a perfect image match.
    pub max_image_compare_points: f32,
    /// Points awarded when the reference used no tape.
    pub max_tape_points: f32,
    /// Score the forger needs to win the round.
    pub min_points_to_win: f32,
    /// Tape points lost for each tape the reference peeled off.
    pub points_deducted_per_tape: f32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            max_image_compare_points: 100.0,
            max_tape_points: 20.0,
            min_points_to_win: 80.0,
            points_deducted_per_tape: 5.0,
        }
    }
}

impl ScoringSettings {
    /// Every value must be finite and non-negative.
    pub fn validate(&self) -> PaintMaskResult<()> {
        let fields = [
            ("max_image_compare_points", self.max_image_compare_points),
            ("max_tape_points", self.max_tape_points),
            ("min_points_to_win", self.min_points_to_win),
            ("points_deducted_per_tape", self.points_deducted_per_tape),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PaintMaskError::validation(format!(
                    "scoring.{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Whether `forger_score` reaches `min_points_to_win`.
    pub fn did_forger_win(&self, forger_score: f32) -> bool {
        forger_score >= self.min_points_to_win
    }
}

/// `max(0, max_tape_points - points_deducted_per_tape * finished_tapes)`.
pub fn tape_score(finished_tapes: usize, settings: &ScoringSettings) -> f32 {
    (settings.max_tape_points - settings.points_deducted_per_tape * finished_tapes as f32).max(0.0)
}

/// Similarity scaled into the image budget plus the reference's tape score.
pub fn forger_score(similarity: f32, finished_tapes: usize, settings: &ScoringSettings) -> f32 {
    similarity.clamp(0.0, 1.0) * settings.max_image_compare_points
        + tape_score(finished_tapes, settings)
}

/// Outcome of one round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Image similarity in `[0,1]`.
    pub similarity: f32,
    /// Points from the reference painting's tape use.
    pub tape_score: f32,
    /// Total forger score.
    pub score: f32,
    /// Whether `score` reached the winning threshold.
    pub did_forger_win: bool,
}

impl RoundOutcome {
    /// Result of a round whose paintings went away before scoring.
    pub fn neutral() -> Self {
        Self {
            similarity: 0.0,
            tape_score: 0.0,
            score: 0.0,
            did_forger_win: false,
        }
    }
}

/// Score `forgery` against `reference`. The tape penalty counts the reference's removed tapes.
#[tracing::instrument(level = "debug", skip_all)]
pub fn determine_result(
    reference: &Painting,
    forgery: &Painting,
    settings: &ScoringSettings,
    scorer: &mut SimilarityScorer,
) -> RoundOutcome {
    let similarity = scorer.compare_paintings(reference, forgery);
    let finished_tapes = reference.active_tape_count();
    let tape_score = tape_score(finished_tapes, settings);
    let score = forger_score(similarity, finished_tapes, settings);
    let outcome = RoundOutcome {
        similarity,
        tape_score,
        score,
        did_forger_win: settings.did_forger_win(score),
    };
    tracing::debug!(
        similarity,
        tape_score,
        score,
        did_forger_win = outcome.did_forger_win,
        "round scored"
    );
    outcome
}

#[cfg(test)]
#[path = "../../tests/unit/scoring/policy.rs"]
mod tests;
