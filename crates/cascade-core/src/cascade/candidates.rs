//! Fallback candidate generation

use crate::coordinate::{BASE_PROFILE, BASE_VERSION, Coordinate, DEFAULT_SEGMENT, NO_USER};
use serde::Serialize;

/// Specificity level of a cascade candidate, most specific first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeLevel {
    /// Per-user override
    User,
    /// Module-specific, no user
    Module,
    /// Scope-wide default module
    ScopeDefault,
    /// Global default scope and module
    GlobalDefault,
    /// Universal base fallback
    Base,
}

/// One candidate coordinate in a fallback sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeStep {
    pub level: CascadeLevel,
    pub coordinate: Coordinate,
}

/// Ordered fallback candidates for a request, most specific first.
pub fn cascade_candidates(requested: &Coordinate) -> Vec<CascadeStep> {
    let Coordinate {
        scope,
        module,
        user_id,
        profile,
        version,
    } = requested;
    let mut steps = Vec::with_capacity(5);

    if user_id != NO_USER {
        steps.push(CascadeStep {
            level: CascadeLevel::User,
            coordinate: requested.clone(),
        });
    }

    steps.push(CascadeStep {
        level: CascadeLevel::Module,
        coordinate: Coordinate::new(
            scope.as_str(),
            module.as_str(),
            NO_USER,
            profile.as_str(),
            *version,
        ),
    });

    if module != DEFAULT_SEGMENT {
        steps.push(CascadeStep {
            level: CascadeLevel::ScopeDefault,
            coordinate: Coordinate::new(
                scope.as_str(),
                DEFAULT_SEGMENT,
                NO_USER,
                profile.as_str(),
                *version,
            ),
        });
    }

    if scope != DEFAULT_SEGMENT {
        steps.push(CascadeStep {
            level: CascadeLevel::GlobalDefault,
            coordinate: Coordinate::new(
                DEFAULT_SEGMENT,
                DEFAULT_SEGMENT,
                NO_USER,
                profile.as_str(),
                *version,
            ),
        });
    }

    if !(profile == BASE_PROFILE && *version == BASE_VERSION) {
        steps.push(CascadeStep {
            level: CascadeLevel::Base,
            coordinate: Coordinate::base(),
        });
    }

    steps
}
