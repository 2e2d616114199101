use serde::{Deserialize, Serialize};

/// Policy thresholds for the recommendation bands. Both conditions of a band
/// must hold; bands are checked from best to worst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    pub attractive_bcr: f64,
    pub attractive_endorsement: f64,
    pub moderate_bcr: f64,
    pub moderate_endorsement: f64,
}

impl RecommendationThresholds {
    pub const ATTRACTIVE_BCR: f64 = 1.2;
    pub const ATTRACTIVE_ENDORSEMENT: f64 = 0.6;
    pub const MODERATE_BCR: f64 = 1.0;
    pub const MODERATE_ENDORSEMENT: f64 = 0.45;
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            attractive_bcr: Self::ATTRACTIVE_BCR,
            attractive_endorsement: Self::ATTRACTIVE_ENDORSEMENT,
            moderate_bcr: Self::MODERATE_BCR,
            moderate_endorsement: Self::MODERATE_ENDORSEMENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Attractive,
    Moderate,
    Weak,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attractive => "High impact, good value",
            Self::Moderate => "Moderate impact, marginal value",
            Self::Weak => "Weak option",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Self::Attractive => {
                "Strong endorsement and a benefit-cost ratio well above one; a candidate for priority scale-up, subject to budget and feasibility."
            }
            Self::Moderate => {
                "Moderate endorsement with value for money at or above break-even; stronger mentorship or lower costs would improve the case."
            }
            Self::Weak => {
                "Endorsement or value for money is modest at this design and cost; revisit mentorship, response time or monthly cost."
            }
        }
    }
}

/// Bands a (BCR, endorsement) pair. An undefined ratio is always weak.
pub fn classify(
    benefit_cost_ratio: Option<f64>,
    endorse_probability: f64,
    thresholds: &RecommendationThresholds,
) -> Recommendation {
    let Some(bcr) = benefit_cost_ratio else {
        return Recommendation::Weak;
    };

    if bcr >= thresholds.attractive_bcr && endorse_probability >= thresholds.attractive_endorsement
    {
        Recommendation::Attractive
    } else if bcr >= thresholds.moderate_bcr
        && endorse_probability >= thresholds.moderate_endorsement
    {
        Recommendation::Moderate
    } else {
        Recommendation::Weak
    }
}
