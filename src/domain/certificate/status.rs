//! Certificate lifecycle per enrollment.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::StateMachine;

/// Where an enrollment stands with respect to its certificate.
///
/// `NotEligible -> Eligible` follows the course completion edge,
/// `Eligible -> Issued` follows a generate request. `Eligible` falls back
/// to `NotEligible` when new content reverts completion before issuance.
/// `Issued` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    NotEligible,
    Eligible,
    Issued,
}

impl CertificateStatus {
    /// Derives the status from an enrollment's persisted fields.
    pub fn of(enrollment: &Enrollment) -> Self {
        match (&enrollment.certificate_ref, enrollment.completed) {
            (Some(_), _) => CertificateStatus::Issued,
            (None, true) => CertificateStatus::Eligible,
            (None, false) => CertificateStatus::NotEligible,
        }
    }
}

impl StateMachine for CertificateStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CertificateStatus::*;
        matches!(
            (self, target),
            (NotEligible, Eligible) | (Eligible, Issued) | (Eligible, NotEligible)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CertificateStatus::*;
        match self {
            NotEligible => vec![Eligible],
            Eligible => vec![Issued, NotEligible],
            Issued => vec![],
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CertificateStatus::NotEligible => "not_eligible",
            CertificateStatus::Eligible => "eligible",
            CertificateStatus::Issued => "issued",
        };
        write!(f, "{}", s)
    }
}
