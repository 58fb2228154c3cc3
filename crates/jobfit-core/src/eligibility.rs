//! Weighted aggregation of the four sub-scores.
//!
//! The standard weights sum to 0.9, not 1.0, so eligibility tops out at 90.
//! They are applied literally and never normalised.

use serde::{Deserialize, Serialize};

use crate::score::SubScores;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EligibilityWeights {
  pub skill:      f64,
  pub education:  f64,
  pub project:    f64,
  pub experience: f64,
}

impl EligibilityWeights {
  pub const STANDARD: Self = Self {
    skill:      0.4,
    education:  0.2,
    project:    0.2,
    experience: 0.1,
  };

  /// Sum of the weights; the upper bound of eligibility divided by 100.
  pub fn total(&self) -> f64 {
    self.skill + self.education + self.project + self.experience
  }

  /// Every weight is finite and non-negative, which keeps eligibility in
  /// `[0, 100 * total()]`.
  pub fn is_valid(&self) -> bool {
    [self.skill, self.education, self.project, self.experience]
      .iter()
      .all(|w| w.is_finite() && *w >= 0.0)
  }

  pub fn eligibility(&self, s: &SubScores) -> f64 {
    self.skill * s.skill_score
      + self.education * s.education_score
      + self.project * s.project_score
      + self.experience * s.experience_score
  }
}

impl Default for EligibilityWeights {
  fn default() -> Self { Self::STANDARD }
}
