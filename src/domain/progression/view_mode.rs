//! Which lessons a learner can see and navigate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Navigation mode.
///
/// `All` resumes where the learner left off; `CompletedOnly` is the review
/// view over lessons already finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    All,
    CompletedOnly,
}

impl ViewMode {
    /// Query string value selecting the review view.
    pub const COMPLETED_PARAM: &'static str = "completed";

    /// Parses the `view` query parameter. Anything other than
    /// `completed` (including absence) selects `All`.
    pub fn from_query_param(view: Option<&str>) -> Self {
        match view {
            Some(v) if v.eq_ignore_ascii_case(Self::COMPLETED_PARAM) => ViewMode::CompletedOnly,
            _ => ViewMode::All,
        }
    }

    /// Inverse of `from_query_param`; `All` is expressed by omitting the parameter.
    pub fn as_query_param(&self) -> Option<&'static str> {
        match self {
            ViewMode::All => None,
            ViewMode::CompletedOnly => Some(Self::COMPLETED_PARAM),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::All => write!(f, "all"),
            ViewMode::CompletedOnly => write!(f, "completed_only"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_maps_to_modes() {
        assert_eq!(ViewMode::from_query_param(None), ViewMode::All);
        assert_eq!(ViewMode::from_query_param(Some("completed")), ViewMode::CompletedOnly);
        assert_eq!(ViewMode::from_query_param(Some("Completed")), ViewMode::CompletedOnly);
        assert_eq!(ViewMode::from_query_param(Some("everything")), ViewMode::All);
    }

    #[test]
    fn query_param_round_trips() {
        for mode in [ViewMode::All, ViewMode::CompletedOnly] {
            assert_eq!(ViewMode::from_query_param(mode.as_query_param()), mode);
        }
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ViewMode::CompletedOnly).unwrap(),
            "\"completed_only\""
        );
    }
}
