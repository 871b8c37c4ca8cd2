use std::fmt;

/// Errors raised while selecting, configuring, or assembling a coupled
/// system. All of them are fatal for the current cycle and propagate
/// unchanged. Solver non-convergence is not an error; `update` reports it
/// through its boolean result and the stored outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemError {
    UnsupportedPhaseCount {
        requested: usize,
        max_phases: usize,
    },
    NameMismatch {
        requested: String,
        canonical: String,
    },
    PhaseCountMismatch {
        expected: usize,
        found: usize,
    },
    DuplicateField {
        field: String,
    },
    UnknownField {
        field: String,
    },
    ComponentMismatch {
        field: String,
        expected: usize,
        found: usize,
    },
    SizeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    DuplicateEquation {
        field: String,
    },
    IncompleteSystem {
        missing: Vec<String>,
    },
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::UnsupportedPhaseCount {
                requested,
                max_phases,
            } => write!(
                f,
                "unsupported phase count: requested {} but at most {} phases are compiled in",
                requested, max_phases
            ),
            SystemError::NameMismatch {
                requested,
                canonical,
            } => write!(
                f,
                "system name mismatch: requested {}, canonical name is {}",
                requested, canonical
            ),
            SystemError::PhaseCountMismatch { expected, found } => write!(
                f,
                "phase roster size mismatch: expected {} phases, found {}",
                expected, found
            ),
            SystemError::DuplicateField { field } => {
                write!(f, "duplicate field in system layout: {}", field)
            }
            SystemError::UnknownField { field } => {
                write!(f, "unknown field: {} has no slot in this system", field)
            }
            SystemError::ComponentMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "component mismatch for field {}: expected {} components, found {}",
                field, expected, found
            ),
            SystemError::SizeMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "size mismatch for {}: expected {}, found {}",
                what, expected, found
            ),
            SystemError::DuplicateEquation { field } => write!(
                f,
                "equation for field {} was already inserted this cycle",
                field
            ),
            SystemError::IncompleteSystem { missing } => write!(
                f,
                "incomplete system: missing equations for [{}]",
                missing.join(", ")
            ),
        }
    }
}

impl std::error::Error for SystemError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let err = SystemError::UnknownField {
            field: "alpha.oil".to_string(),
        };
        assert!(err.to_string().contains("alpha.oil"));

        let err = SystemError::IncompleteSystem {
            missing: vec!["U".to_string(), "p".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "incomplete system: missing equations for [U, p]"
        );
    }

    #[test]
    fn display_reports_the_compiled_ceiling() {
        let err = SystemError::UnsupportedPhaseCount {
            requested: 12,
            max_phases: 8,
        };
        let text = err.to_string();
        assert!(text.contains("12"));
        assert!(text.contains("8"));
    }
}
