//! Run-time phase count to compile-time block width dispatch.
//!
//! The family of concrete systems is enumerated once, at compile time, into
//! a static factory table indexed by phase count. Selection is a bounds
//! check plus a table lookup; nothing registers itself at run time and no
//! global state is mutated.

use std::sync::Arc;

use super::block::BlockSystem;
use super::config::SystemConfig;
use super::error::SystemError;
use super::layout::PhaseRoster;
use super::CoupledSystem;
use crate::mesh::Mesh;

/// Largest supported phase count. Raising the ceiling means extending the
/// factory table enumeration below and recompiling.
pub const MAX_PHASES: usize = 8;

/// Number of phase equations carried for `n_phases` phases. Every fraction
/// is solved jointly; closure handling is a post-solve policy, not a slot
/// elimination.
pub const fn phase_equation_count(n_phases: usize) -> usize {
    n_phases
}

/// Equation rows per cell: three velocity components, pressure, and the
/// phase equations.
pub const fn block_width(n_phases: usize) -> usize {
    4 + phase_equation_count(n_phases)
}

/// Canonical name reported by the system bound to `n_phases` phases.
pub fn canonical_name(n_phases: usize) -> String {
    format!("BlockSystem<{}>", n_phases)
}

type SystemFactory =
    fn(Arc<Mesh>, PhaseRoster, SystemConfig) -> Result<Box<dyn CoupledSystem>, SystemError>;

fn make_system<const N: usize, const E: usize>(
    mesh: Arc<Mesh>,
    phases: PhaseRoster,
    config: SystemConfig,
) -> Result<Box<dyn CoupledSystem>, SystemError> {
    Ok(Box::new(BlockSystem::<N, E>::new(mesh, phases, config)?))
}

macro_rules! factory_table {
    ($($n:literal),+ $(,)?) => {
        [$(make_system::<$n, { block_width($n) }>),+]
    };
}

static FACTORIES: [SystemFactory; MAX_PHASES + 1] = factory_table![0, 1, 2, 3, 4, 5, 6, 7, 8];

/// Selects and constructs the concrete system for `phases.len()` phases.
pub fn select(
    mesh: Arc<Mesh>,
    phases: PhaseRoster,
    config: SystemConfig,
) -> Result<Box<dyn CoupledSystem>, SystemError> {
    let bound_name = canonical_name(phases.len());
    select_named(mesh, phases, config, &bound_name)
}

/// Selects with an explicit bound name. The name must match the canonical
/// name of the system the phase count maps to.
pub fn select_named(
    mesh: Arc<Mesh>,
    phases: PhaseRoster,
    config: SystemConfig,
    bound_name: &str,
) -> Result<Box<dyn CoupledSystem>, SystemError> {
    let n_phases = phases.len();
    let factory = FACTORIES
        .get(n_phases)
        .ok_or(SystemError::UnsupportedPhaseCount {
            requested: n_phases,
            max_phases: MAX_PHASES,
        })?;
    let canonical = canonical_name(n_phases);
    if bound_name != canonical {
        return Err(SystemError::NameMismatch {
            requested: bound_name.to_string(),
            canonical,
        });
    }
    log::info!(
        "selected {} ({} equation rows per cell)",
        canonical,
        block_width(n_phases)
    );
    factory(mesh, phases, config)
}
