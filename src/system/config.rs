use serde::{Deserialize, Serialize};

/// How phase-fraction fields are treated after the coupled solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseFieldsScheme {
    /// Every fraction keeps the value its own transport equation produced.
    #[default]
    Transport,
    /// The trailing phase is overwritten with one minus the sum of the
    /// leading fractions after the solution is distributed.
    ClosedTransport,
}

impl PhaseFieldsScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseFieldsScheme::Transport => "transport",
            PhaseFieldsScheme::ClosedTransport => "closedTransport",
        }
    }
}

impl std::str::FromStr for PhaseFieldsScheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "transport" => Ok(PhaseFieldsScheme::Transport),
            "closedTransport" | "closed_transport" | "closed-transport" => {
                Ok(PhaseFieldsScheme::ClosedTransport)
            }
            _ => Err(format!("unknown phase fields scheme: {}", value)),
        }
    }
}

/// Controls forwarded to the block linear solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverControls {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for SolverControls {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-7,
        }
    }
}

/// Construction-time options of a coupled system. The field names decide
/// which slots the fixed pressure/velocity block binds to; everything else
/// keeps its default unless a case overrides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub pressure_name: String,
    pub velocity_name: String,
    pub phase_fields_scheme: PhaseFieldsScheme,
    pub solver: SolverControls,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            pressure_name: "p".to_string(),
            velocity_name: "U".to_string(),
            phase_fields_scheme: PhaseFieldsScheme::default(),
            solver: SolverControls::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_as_str_matches_expected_names() {
        assert_eq!(PhaseFieldsScheme::Transport.as_str(), "transport");
        assert_eq!(
            PhaseFieldsScheme::ClosedTransport.as_str(),
            "closedTransport"
        );
    }

    #[test]
    fn scheme_from_str_parses_aliases() {
        assert_eq!(
            "transport".parse::<PhaseFieldsScheme>().unwrap(),
            PhaseFieldsScheme::Transport
        );
        assert_eq!(
            "closedTransport".parse::<PhaseFieldsScheme>().unwrap(),
            PhaseFieldsScheme::ClosedTransport
        );
        assert_eq!(
            "closed_transport".parse::<PhaseFieldsScheme>().unwrap(),
            PhaseFieldsScheme::ClosedTransport
        );
    }

    #[test]
    fn scheme_serde_form_matches_as_str() {
        for scheme in [
            PhaseFieldsScheme::Transport,
            PhaseFieldsScheme::ClosedTransport,
        ] {
            let json = serde_json::to_string(&scheme).unwrap();
            assert_eq!(json, format!("\"{}\"", scheme.as_str()));
        }
        let parsed: PhaseFieldsScheme = serde_json::from_str("\"closedTransport\"").unwrap();
        assert_eq!(parsed, PhaseFieldsScheme::ClosedTransport);
    }

    #[test]
    fn scheme_from_str_errors_on_unknown() {
        let err = "nope".parse::<PhaseFieldsScheme>().unwrap_err();
        assert!(err.contains("unknown phase fields scheme"));
    }

    #[test]
    fn config_defaults_use_standard_field_names() {
        let config = SystemConfig::default();
        assert_eq!(config.pressure_name, "p");
        assert_eq!(config.velocity_name, "U");
        assert_eq!(config.phase_fields_scheme, PhaseFieldsScheme::Transport);
        assert_eq!(config.solver.max_iterations, 200);
    }

    #[test]
    fn config_parses_from_json() {
        let config: SystemConfig = serde_json::from_str(
            r#"{
                "pressure_name": "p_rgh",
                "velocity_name": "U",
                "phase_fields_scheme": "closedTransport",
                "solver": { "max_iterations": 50, "tolerance": 1e-9 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.pressure_name, "p_rgh");
        assert_eq!(
            config.phase_fields_scheme,
            PhaseFieldsScheme::ClosedTransport
        );
        assert_eq!(config.solver.max_iterations, 50);
        assert!((config.solver.tolerance - 1e-9).abs() < 1e-20);
    }
}
