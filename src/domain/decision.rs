use std::fmt;

/// Outcome of evaluating one candidate.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    Accepted { score: f64 },
    Rejected { score: f64 },
    /// Short-circuited by the duration pre-check, nothing was scored.
    TooLong { duration: u32, max_duration: u32 },
    ExtractionFailed(String),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted { .. })
    }

    /// Fused score for candidates that reached the scoring stage.
    pub fn score(&self) -> Option<f64> {
        match self {
            Decision::Accepted { score } | Decision::Rejected { score } => Some(*score),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Accepted { score } => write!(f, "accepted (score {score:.3})"),
            Decision::Rejected { score } => write!(f, "rejected (score {score:.3})"),
            Decision::TooLong {
                duration,
                max_duration,
            } => write!(f, "rejected: {duration}s exceeds {max_duration}s"),
            Decision::ExtractionFailed(reason) => write!(f, "rejected: {reason}"),
        }
    }
}
