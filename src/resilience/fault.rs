//! Fault taxonomy and failure classification.
//!
//! # Responsibilities
//! - Represent every way an outbound attempt can fail
//! - Decide, per fault, whether a retry can help (transient vs permanent)
//! - Decide, per fault, whether the circuit breaker should count it
//!
//! # Design Decisions
//! - Classification is the single source of truth for both the retry policy
//!   and breaker accounting
//! - Unknown faults are permanent; retrying blind is worse than failing fast
//! - Breaker exemptions are an explicit status-code list, never an implicit
//!   allowlist buried in call sites

use thiserror::Error;

/// A fault raised by one attempt against the upstream dependency.
#[derive(Debug, Error)]
pub enum Fault {
    /// The request exceeded its deadline.
    #[error("upstream request timed out")]
    Timeout,

    /// The connection could not be established.
    #[error("upstream connection failed: {0}")]
    Connect(String),

    /// The upstream answered with a non-success status code.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The upstream answered 2xx but the body could not be decoded.
    #[error("upstream response could not be decoded: {0}")]
    Decode(String),

    /// Anything the client layer could not attribute to the cases above.
    #[error("unexpected upstream failure: {0}")]
    Unexpected(String),
}

impl Fault {
    /// Status code carried by the fault, if it is a status fault.
    pub fn status(&self) -> Option<u16> {
        match self {
            Fault::Status(code) => Some(*code),
            _ => None,
        }
    }

    /// True for a lookup-style miss (404) from the upstream.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Stable label for the `errors_total` metric.
    pub fn kind(&self) -> &'static str {
        match self {
            Fault::Timeout => "timeout",
            Fault::Connect(_) => "connect",
            Fault::Status(_) => "status",
            Fault::Decode(_) => "decode",
            Fault::Unexpected(_) => "unexpected",
        }
    }
}

/// Whether a fault is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultClass {
    /// Retry may help: timeouts, connection errors, 5xx.
    Transient,
    /// Retry cannot help: 4xx, decode failures, unknowns.
    Permanent,
}

/// Maps faults to [`FaultClass`] and owns the breaker exemption list.
#[derive(Debug, Clone, Default)]
pub struct FailureClassifier {
    /// Status faults that are reported to the caller but never counted as
    /// breaker failures (e.g. 404 for an unknown instrument).
    exempt_status_codes: Vec<u16>,
}

impl FailureClassifier {
    pub fn new(exempt_status_codes: Vec<u16>) -> Self {
        Self {
            exempt_status_codes,
        }
    }

    /// Classify a fault for retry purposes.
    pub fn classify(&self, fault: &Fault) -> FaultClass {
        match fault {
            Fault::Timeout | Fault::Connect(_) => FaultClass::Transient,
            Fault::Status(code) if *code >= 500 => FaultClass::Transient,
            Fault::Status(_) | Fault::Decode(_) => FaultClass::Permanent,
            Fault::Unexpected(_) => {
                // Indicates a classification gap in the client layer.
                tracing::warn!(fault = %fault, "unclassified fault treated as permanent");
                FaultClass::Permanent
            }
        }
    }

    /// Whether this fault should be recorded as a breaker failure.
    ///
    /// Exempt faults are neutral: they neither increment nor reset the
    /// breaker's failure count.
    pub fn counts_toward_breaker(&self, fault: &Fault) -> bool {
        match fault.status() {
            Some(code) => !self.exempt_status_codes.contains(&code),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_server_errors_are_transient() {
        let classifier = FailureClassifier::default();
        assert_eq!(classifier.classify(&Fault::Timeout), FaultClass::Transient);
        assert_eq!(
            classifier.classify(&Fault::Connect("refused".into())),
            FaultClass::Transient
        );
        assert_eq!(
            classifier.classify(&Fault::Status(500)),
            FaultClass::Transient
        );
        assert_eq!(
            classifier.classify(&Fault::Status(503)),
            FaultClass::Transient
        );
    }

    #[test]
    fn client_errors_are_permanent() {
        let classifier = FailureClassifier::default();
        assert_eq!(
            classifier.classify(&Fault::Status(404)),
            FaultClass::Permanent
        );
        assert_eq!(
            classifier.classify(&Fault::Status(400)),
            FaultClass::Permanent
        );
    }

    #[test]
    fn unknown_faults_default_to_permanent() {
        let classifier = FailureClassifier::default();
        assert_eq!(
            classifier.classify(&Fault::Unexpected("boom".into())),
            FaultClass::Permanent
        );
        assert_eq!(
            classifier.classify(&Fault::Decode("bad json".into())),
            FaultClass::Permanent
        );
    }

    #[test]
    fn exempt_status_codes_skip_breaker_accounting() {
        let classifier = FailureClassifier::new(vec![404]);
        assert!(!classifier.counts_toward_breaker(&Fault::Status(404)));
        assert!(classifier.counts_toward_breaker(&Fault::Status(500)));
        assert!(classifier.counts_toward_breaker(&Fault::Timeout));

        // Default exemption list is empty: everything counts.
        let strict = FailureClassifier::default();
        assert!(strict.counts_toward_breaker(&Fault::Status(404)));
    }
}
