//! Release selection for disc ID lookups.
//!
//! A disc ID can match several releases (regional pressings, box sets that
//! reuse a disc). The candidates are filtered through a list of criteria and
//! the lookup only resolves when exactly one release survives.

use crate::config::IdentificationConfig;

use super::domain::Release;

/// One tie-break rule a candidate release must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseCriterion {
    /// Release country is one of these codes.
    CountryIn(Vec<String>),
    /// Exactly one medium, of this format.
    SingleMedium { format: String },
}

impl ReleaseCriterion {
    pub fn accepts(&self, release: &Release) -> bool {
        match self {
            ReleaseCriterion::CountryIn(countries) => release
                .country
                .as_ref()
                .is_some_and(|c| countries.contains(c)),
            ReleaseCriterion::SingleMedium { format } => match release.media.as_slice() {
                [medium] => medium.format.as_deref() == Some(format.as_str()),
                _ => false,
            },
        }
    }
}

/// Applies the tie-break criteria to disc ID candidates.
#[derive(Debug, Clone)]
pub struct ReleaseSelector {
    criteria: Vec<ReleaseCriterion>,
}

impl ReleaseSelector {
    pub fn new(criteria: Vec<ReleaseCriterion>) -> Self {
        Self { criteria }
    }

    pub fn from_config(config: &IdentificationConfig) -> Self {
        Self::new(vec![
            ReleaseCriterion::CountryIn(config.allowed_countries.clone()),
            ReleaseCriterion::SingleMedium {
                format: config.media_format.clone(),
            },
        ])
    }

    /// The single release to use, if there is one.
    ///
    /// A lone candidate is taken as is; several are filtered and must
    /// narrow down to exactly one.
    pub fn select<'a>(&self, releases: &'a [Release]) -> Option<&'a Release> {
        if let [only] = releases {
            return Some(only);
        }

        let survivors: Vec<&Release> = releases
            .iter()
            .filter(|release| {
                self.criteria.iter().all(|criterion| {
                    let accepted = criterion.accepts(release);
                    if !accepted {
                        tracing::debug!(release = %release.id, ?criterion, "Skipping release");
                    }
                    accepted
                })
            })
            .collect();

        match survivors.as_slice() {
            [one] => Some(*one),
            _ => {
                tracing::debug!(
                    candidates = releases.len(),
                    survivors = survivors.len(),
                    "Could not narrow disc ID to one release"
                );
                None
            }
        }
    }
}
