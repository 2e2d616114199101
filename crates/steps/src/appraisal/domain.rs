use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Lowercases and folds `-` and spaces into `_` so user input such as
/// "In-Person" or "career pathway" resolves to a canonical key.
fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

/// Declares a categorical scenario attribute.
///
/// Every generated enum carries an `Unrecognized` variant that keeps the raw
/// input around. Unknown levels never fail to parse; they resolve to a zero
/// effect in the preference tables and to "no parameters" in tier lookups.
macro_rules! categorical_level {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => $key:literal, $label:literal $(, [$($alias:literal),*])? ; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $variant, )+
            Unrecognized(String),
        }

        impl $name {
            pub fn ordered() -> Vec<Self> {
                vec![$( Self::$variant ),+]
            }

            /// Canonical key used by the coefficient and parameter tables.
            pub fn key(&self) -> &str {
                match self {
                    $( Self::$variant => $key, )+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $( Self::$variant => $label, )+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }

            pub fn parse(raw: &str) -> Self {
                let normalized = normalize_key(raw);
                match normalized.as_str() {
                    $( $key $($(| $alias)*)? => Self::$variant, )+
                    _ => Self::Unrecognized(raw.trim().to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::parse(&value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.key().to_string()
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::parse(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical_level! {
    /// Programme tier; drives duration and the tier parameter lookup.
    pub enum ProgrammeTier {
        Frontline => "frontline", "Frontline (3 months)";
        Intermediate => "intermediate", "Intermediate (12 months)";
        Advanced => "advanced", "Advanced (24 months)";
    }
}

categorical_level! {
    pub enum CareerIncentive {
        Certificate => "certificate", "Government and partner certificate";
        UniversityQualification => "uniqual", "University qualification", ["university", "university_qualification"];
        CareerPathway => "career_path", "Government career pathway", ["career_pathway", "pathway"];
    }
}

categorical_level! {
    pub enum MentorshipIntensity {
        Low => "low", "Low";
        Medium => "medium", "Medium";
        High => "high", "High";
    }
}

categorical_level! {
    pub enum DeliveryMode {
        Blended => "blended", "Blended";
        InPerson => "inperson", "Fully in person", ["in_person"];
        Online => "online", "Fully online";
    }
}

categorical_level! {
    /// Expected response time for events, keyed by the number of days.
    pub enum ResponseTime {
        Within30Days => "30", "Within 30 days", ["30_days", "30d"];
        Within15Days => "15", "Within 15 days", ["15_days", "15d"];
        Within7Days => "7", "Within 7 days", ["7_days", "7d"];
    }
}

categorical_level! {
    /// Identifier of a preference model in the model catalog.
    pub enum PreferenceModelId {
        Average => "average", "Average mixed logit", ["mxl", "mixed_logit"];
        Supportive => "supportive", "Supportive latent class", ["lc2", "latent_class"];
    }
}

impl PreferenceModelId {
    /// Model used when a configuration names an unknown model.
    pub const PRIMARY: Self = Self::Average;
}

/// The five attributes that carry additive utility effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Tier,
    Career,
    Mentorship,
    Delivery,
    ResponseTime,
}

impl Attribute {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Tier,
            Self::Career,
            Self::Mentorship,
            Self::Delivery,
            Self::ResponseTime,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tier => "Programme tier",
            Self::Career => "Career incentive",
            Self::Mentorship => "Mentorship intensity",
            Self::Delivery => "Delivery mode",
            Self::ResponseTime => "Expected response time",
        }
    }
}

/// A single scenario as chosen by the user. Built fresh for every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub tier: ProgrammeTier,
    pub career: CareerIncentive,
    pub mentorship: MentorshipIntensity,
    pub delivery: DeliveryMode,
    pub response: ResponseTime,
    /// Native currency (INR) per trainee per month.
    pub cost_per_trainee_per_month: f64,
    pub trainees_per_cohort: u32,
    pub cohorts: u32,
    pub model: PreferenceModelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_template: Option<String>,
    #[serde(default = "default_true")]
    pub include_opportunity_cost: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            tier: ProgrammeTier::Frontline,
            career: CareerIncentive::Certificate,
            mentorship: MentorshipIntensity::Low,
            delivery: DeliveryMode::Blended,
            response: ResponseTime::Within30Days,
            cost_per_trainee_per_month: 250_000.0,
            trainees_per_cohort: 20,
            cohorts: 10,
            model: PreferenceModelId::Average,
            cost_template: None,
            include_opportunity_cost: true,
        }
    }
}

impl ScenarioConfig {
    /// Largest cost per trainee per month (INR) an evaluation accepts.
    pub const MAX_MONTHLY_COST: f64 = 1e12;

    /// Level key chosen for `attribute`, as used by the coefficient tables.
    pub fn level_key(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Tier => self.tier.key(),
            Attribute::Career => self.career.key(),
            Attribute::Mentorship => self.mentorship.key(),
            Attribute::Delivery => self.delivery.key(),
            Attribute::ResponseTime => self.response.key(),
        }
    }

    /// Negative or non-finite monthly costs are read as zero; anything above
    /// [`Self::MAX_MONTHLY_COST`] is capped there.
    pub fn monthly_cost(&self) -> f64 {
        if self.cost_per_trainee_per_month.is_finite() {
            self.cost_per_trainee_per_month
                .clamp(0.0, Self::MAX_MONTHLY_COST)
        } else {
            0.0
        }
    }

    pub fn default_scenario_name(&self) -> String {
        format!("{} - {}", self.tier.label(), self.mentorship.label())
    }
}
