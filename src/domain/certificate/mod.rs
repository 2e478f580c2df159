//! Certificate module - Eligibility gate for completion certificates.

mod status;

pub use status::CertificateStatus;
