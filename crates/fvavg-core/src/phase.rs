//! Breath phase bookkeeping.

/// Inspiration (flow < 0) or expiration (flow > 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Insp,
    Exp,
}

impl PhaseKind {
    /// Classify a flow sample into a phase, if it is unambiguously signed.
    pub fn from_flow(f: f64) -> Option<Self> {
        if f < 0.0 {
            Some(Self::Insp)
        } else if f > 0.0 {
            Some(Self::Exp)
        } else {
            None
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Insp => Self::Exp,
            Self::Exp => Self::Insp,
        }
    }
}
