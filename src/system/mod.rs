//! Block-coupled system assembly: phase-count dispatch, the equation
//! insertion protocol, and the per-cycle update that solves the merged
//! system and distributes the result.

pub mod block;
pub mod config;
pub mod equation;
pub mod error;
pub mod layout;
pub mod matrix;
pub mod registry;
pub mod selector;

pub use block::BlockSystem;
pub use config::{PhaseFieldsScheme, SolverControls, SystemConfig};
pub use equation::{ScalarEquation, VectorEquation, VectorScalarCoupling, VectorVectorCoupling};
pub use error::SystemError;
pub use layout::{PhaseRoster, Slot, SlotMap};
pub use registry::EquationRegistry;
pub use selector::{canonical_name, select, select_named, MAX_PHASES};

use std::io;

use crate::field::FieldStore;
use crate::linear::SolveOutcome;

/// Operation applied to a system through [`CoupledSystem::execute`].
pub type SystemCallback<'a> = dyn FnMut(&mut dyn CoupledSystem) + 'a;

/// Assembly facade over one block-coupled system. Within a cycle, callers
/// insert per-field equations and any off-diagonal couplings, then call
/// [`update`](CoupledSystem::update) exactly once; the completion set
/// guards against missing or duplicated equations. Instances are
/// independent: one region, one system, no shared mutable state.
pub trait CoupledSystem: Send + std::fmt::Debug {
    /// Canonical instance name, `BlockSystem<N>` for `N` phases.
    fn name(&self) -> String;

    fn phase_count(&self) -> usize;

    /// Equation rows per cell.
    fn n_eqns(&self) -> usize;

    fn phases(&self) -> &PhaseRoster;

    fn config(&self) -> &SystemConfig;

    fn slots(&self) -> &SlotMap;

    fn fields(&self) -> &FieldStore;

    fn fields_mut(&mut self) -> &mut FieldStore;

    /// Merges a scalar equation into its field's diagonal slot and marks
    /// that field complete for this cycle.
    fn insert_scalar_equation(&mut self, eqn: &ScalarEquation) -> Result<(), SystemError>;

    /// Merges a vector equation into its field's three rows and marks that
    /// field complete for this cycle.
    fn insert_vector_equation(&mut self, eqn: &VectorEquation) -> Result<(), SystemError>;

    /// Adds a dense per-cell coupling coefficient into the off-diagonal
    /// block `(attached, coupled)`. Never marks completion.
    fn insert_equation_coupling(
        &mut self,
        attached: &str,
        coupled: &str,
        coupling: &[f64],
    ) -> Result<(), SystemError>;

    /// Merges a full scalar equation as the off-diagonal block
    /// `(attached, coupled)`; the equation's own field name is ignored,
    /// the explicit arguments choose the block. Never marks completion.
    fn insert_matrix_coupling(
        &mut self,
        attached: &str,
        coupled: &str,
        coupling: &ScalarEquation,
    ) -> Result<(), SystemError>;

    /// Merges a scalar-row-over-vector-columns coupling, `attached` being
    /// the scalar equation and `coupled` the vector unknown.
    fn insert_vector_scalar_coupling(
        &mut self,
        attached: &str,
        coupled: &str,
        coupling: &VectorScalarCoupling,
    ) -> Result<(), SystemError>;

    /// Merges a vector-rows-over-scalar-column coupling, `attached` being
    /// the vector equation and `coupled` the scalar unknown.
    fn insert_vector_vector_coupling(
        &mut self,
        attached: &str,
        coupled: &str,
        coupling: &VectorVectorCoupling,
    ) -> Result<(), SystemError>;

    /// Solves the assembled system and distributes the solution back into
    /// the fields. Fails if any required equation is missing; afterwards
    /// the completion set and the matrix are reset for the next cycle.
    /// Returns the solver's convergence flag; non-convergence is a normal
    /// result, not an error.
    fn update(&mut self) -> Result<bool, SystemError>;

    /// Outcome of the most recent solve, if any cycle completed.
    fn last_outcome(&self) -> Option<&SolveOutcome>;

    /// Applies `op` to this system, dispatching through the trait object
    /// so diagnostics written against the facade run on any phase count.
    fn execute(&mut self, op: &mut SystemCallback);
}

/// Persistence capability, kept separate from the assembly contract.
/// Assembled systems identify themselves by name but never serialize their
/// coefficient state.
pub trait Persistent {
    /// Returns true if anything was written.
    fn write_data(&self, out: &mut dyn io::Write) -> bool;
}
