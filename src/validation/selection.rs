//! Admission rules for building an event selection under a pass.
//!
//! `can_add` and `count_selection` share [`tally`], so the counts shown to a
//! participant and the limits enforced on submission cannot drift apart.

use crate::catalog::{Catalog, Event, Pass};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Why a candidate event cannot join a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Conflict { candidate: String, existing: String },
    TotalLimit { max: u32 },
    TechnicalLimit { max: u32 },
    NonTechnicalLimit { max: u32 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Conflict { candidate, existing } => write!(
                f,
                "{} clashes with {} (same track and time slot)",
                candidate, existing
            ),
            Rejection::TotalLimit { max } => {
                write!(f, "Your pass allows at most {} event(s)", max)
            }
            Rejection::TechnicalLimit { max } => {
                write!(f, "Your pass allows at most {} technical event(s)", max)
            }
            Rejection::NonTechnicalLimit { max } => {
                write!(f, "Your pass allows at most {} non-technical event(s)", max)
            }
        }
    }
}

/// Successful outcome of [`SelectionValidator::can_add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admissible,
    /// Candidate is already selected; adding it again changes nothing
    AlreadySelected,
}

/// Why an abstract event's fallback is unacceptable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackError {
    Missing { event: String },
    Unknown { event: String, fallback_id: String },
    Abstract { event: String, fallback: String },
    Conflict { event: String, fallback: String },
    AlreadySelected { event: String, fallback: String },
}

impl fmt::Display for FallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackError::Missing { event } => {
                write!(f, "Please choose a fallback event for {}", event)
            }
            FallbackError::Unknown { event, fallback_id } => write!(
                f,
                "Invalid fallback event '{}' for {}",
                fallback_id, event
            ),
            FallbackError::Abstract { event, fallback } => write!(
                f,
                "Fallback for {} cannot be {}, which also requires an abstract",
                event, fallback
            ),
            FallbackError::Conflict { event, fallback } => write!(
                f,
                "Fallback {} for {} clashes with another selected event",
                fallback, event
            ),
            FallbackError::AlreadySelected { event, fallback } => write!(
                f,
                "Fallback for {} cannot be {}, which is already selected",
                event, fallback
            ),
        }
    }
}

/// Counts of a selection against its pass limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCounts {
    pub tech: u32,
    pub non_tech: u32,
    pub total: u32,
    pub max_tech: u32,
    pub max_non_tech: u32,
    pub max_total: u32,
}

fn tally<'a, I>(selection: I) -> (u32, u32)
where
    I: IntoIterator<Item = &'a Event>,
{
    selection.into_iter().fold((0, 0), |(tech, non_tech), event| {
        if event.is_technical() {
            (tech + 1, non_tech)
        } else {
            (tech, non_tech + 1)
        }
    })
}

/// Stateless admission checks; catalog and pass are passed in explicitly
pub struct SelectionValidator;

impl SelectionValidator {
    /// Decide whether `candidate` may join `selection`.
    ///
    /// Checks run in a fixed order and stop at the first failure: duplicate,
    /// track/slot conflict, total limit, then category limits.
    pub fn can_add(
        selection: &[&Event],
        pass: &Pass,
        candidate: &Event,
    ) -> Result<Admission, Rejection> {
        if selection.iter().any(|e| e.id == candidate.id) {
            return Ok(Admission::AlreadySelected);
        }

        if let Some(existing) = selection.iter().find(|e| e.conflicts_with(candidate)) {
            return Err(Rejection::Conflict {
                candidate: candidate.title.clone(),
                existing: existing.title.clone(),
            });
        }

        if selection.len() as u64 >= u64::from(pass.max_total) {
            return Err(Rejection::TotalLimit {
                max: pass.max_total,
            });
        }

        let (tech, non_tech) = tally(selection.iter().copied().chain(std::iter::once(candidate)));
        if tech > pass.max_technical {
            return Err(Rejection::TechnicalLimit {
                max: pass.max_technical,
            });
        }
        if non_tech > pass.max_non_technical {
            return Err(Rejection::NonTechnicalLimit {
                max: pass.max_non_technical,
            });
        }

        Ok(Admission::Admissible)
    }

    pub fn count_selection(selection: &[&Event], pass: &Pass) -> SelectionCounts {
        let (tech, non_tech) = tally(selection.iter().copied());
        SelectionCounts {
            tech,
            non_tech,
            total: tech + non_tech,
            max_tech: pass.max_technical,
            max_non_tech: pass.max_non_technical,
            max_total: pass.max_total,
        }
    }

    /// Replay a complete selection through `can_add`, as if picked one by one
    pub fn validate_selection(
        selection: &[&Event],
        pass: &Pass,
    ) -> Result<SelectionCounts, Rejection> {
        let mut accepted: Vec<&Event> = Vec::with_capacity(selection.len());
        for candidate in selection {
            if Self::can_add(&accepted, pass, candidate)? == Admission::Admissible {
                accepted.push(candidate);
            }
        }
        Ok(Self::count_selection(&accepted, pass))
    }

    /// Events that can stand in for `abstract_event` if its abstract is rejected
    pub fn fallbacks_for<'a>(
        selection: &[&Event],
        abstract_event: &Event,
        all_events: &'a [Event],
    ) -> Vec<&'a Event> {
        all_events
            .iter()
            .filter(|candidate| !candidate.is_abstract())
            .filter(|candidate| {
                !selection
                    .iter()
                    .filter(|selected| selected.id != abstract_event.id)
                    .any(|selected| selected.conflicts_with(candidate))
            })
            .collect()
    }

    /// Check that every abstract event in `selection` names an acceptable fallback.
    ///
    /// Returns abstract event id -> fallback event id. Entries for events that
    /// are not abstract are ignored.
    pub fn validate_fallbacks(
        selection: &[&Event],
        fallbacks: &HashMap<String, String>,
        catalog: &Catalog,
    ) -> Result<HashMap<String, String>, FallbackError> {
        let mut chosen = HashMap::new();

        for event in selection.iter().filter(|e| e.is_abstract()) {
            let fallback_id = fallbacks
                .get(&event.id)
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .ok_or_else(|| FallbackError::Missing {
                    event: event.title.clone(),
                })?;

            let fallback = catalog
                .lookup_event(fallback_id)
                .ok_or_else(|| FallbackError::Unknown {
                    event: event.title.clone(),
                    fallback_id: fallback_id.to_string(),
                })?;

            if fallback.is_abstract() {
                return Err(FallbackError::Abstract {
                    event: event.title.clone(),
                    fallback: fallback.title.clone(),
                });
            }

            let admissible = Self::fallbacks_for(selection, event, catalog.list_events())
                .iter()
                .any(|candidate| candidate.id == fallback.id);
            if !admissible {
                return Err(FallbackError::Conflict {
                    event: event.title.clone(),
                    fallback: fallback.title.clone(),
                });
            }

            // ONLINE events never conflict, not even with themselves
            if selection.iter().any(|selected| selected.id == fallback.id) {
                return Err(FallbackError::AlreadySelected {
                    event: event.title.clone(),
                    fallback: fallback.title.clone(),
                });
            }

            chosen.insert(event.id.clone(), fallback.id.clone());
        }

        Ok(chosen)
    }
}
