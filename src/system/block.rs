use std::io;
use std::sync::Arc;

use nalgebra::SVector;

use super::config::{PhaseFieldsScheme, SystemConfig};
use super::equation::{ScalarEquation, VectorEquation, VectorScalarCoupling, VectorVectorCoupling};
use super::error::SystemError;
use super::layout::{PhaseRoster, Slot, SlotMap};
use super::matrix::BlockMatrix;
use super::registry::EquationRegistry;
use super::selector::{block_width, canonical_name};
use super::{CoupledSystem, Persistent, SystemCallback};
use crate::field::FieldStore;
use crate::linear::{solve_coupled, SolveOutcome};
use crate::mesh::Mesh;

/// Concrete block-coupled system for `N` phases with `E = N + 4` equation
/// rows per cell. Usually constructed through the selector; constructing a
/// width that disagrees with the phase count fails to compile.
#[derive(Debug)]
pub struct BlockSystem<const N: usize, const E: usize> {
    mesh: Arc<Mesh>,
    phases: PhaseRoster,
    config: SystemConfig,
    slots: SlotMap,
    registry: EquationRegistry,
    matrix: BlockMatrix<E>,
    fields: FieldStore,
    last_outcome: Option<SolveOutcome>,
    first_run: bool,
}

impl<const N: usize, const E: usize> BlockSystem<N, E> {
    /// Equation rows per cell.
    pub const N_EQNS: usize = E;

    const WIDTH_OK: () = assert!(
        E == block_width(N),
        "block width must equal the phase count plus four"
    );

    pub fn new(
        mesh: Arc<Mesh>,
        phases: PhaseRoster,
        config: SystemConfig,
    ) -> Result<Self, SystemError> {
        let () = Self::WIDTH_OK;
        if phases.len() != N {
            return Err(SystemError::PhaseCountMismatch {
                expected: N,
                found: phases.len(),
            });
        }

        let slots = SlotMap::build(&phases, &config.velocity_name, &config.pressure_name)?;

        let mut fields = FieldStore::new(mesh.num_cells());
        for (name, slot) in slots.iter() {
            if slot.components() == 3 {
                fields.insert_vector(name);
            } else {
                fields.insert_scalar(name);
            }
        }

        let registry = EquationRegistry::new(slots.names().map(|name| name.to_string()));
        let matrix = BlockMatrix::new(&mesh);

        Ok(Self {
            mesh,
            phases,
            config,
            slots,
            registry,
            matrix,
            fields,
            last_outcome: None,
            first_run: true,
        })
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// The assembled coefficients: diagonal, upper, lower, and source.
    pub fn matrix(&self) -> &BlockMatrix<E> {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut BlockMatrix<E> {
        &mut self.matrix
    }

    fn slot(&self, field: &str) -> Result<Slot, SystemError> {
        self.slots.slot(field).ok_or_else(|| SystemError::UnknownField {
            field: field.to_string(),
        })
    }

    fn scalar_slot(&self, field: &str) -> Result<Slot, SystemError> {
        let slot = self.slot(field)?;
        if slot.components() != 1 {
            return Err(SystemError::ComponentMismatch {
                field: field.to_string(),
                expected: 1,
                found: slot.components(),
            });
        }
        Ok(slot)
    }

    fn vector_slot(&self, field: &str) -> Result<Slot, SystemError> {
        let slot = self.slot(field)?;
        if slot.components() != 3 {
            return Err(SystemError::ComponentMismatch {
                field: field.to_string(),
                expected: 3,
                found: slot.components(),
            });
        }
        Ok(slot)
    }

    fn gather(&self, x: &mut [SVector<f64, E>]) {
        for (name, slot) in self.slots.iter() {
            let off = slot.offset();
            if slot.components() == 3 {
                if let Some(field) = self.fields.vector(name) {
                    for (cell, xc) in x.iter_mut().enumerate() {
                        xc[off] = field.x[cell];
                        xc[off + 1] = field.y[cell];
                        xc[off + 2] = field.z[cell];
                    }
                }
            } else if let Some(values) = self.fields.scalar(name) {
                for (cell, xc) in x.iter_mut().enumerate() {
                    xc[off] = values[cell];
                }
            }
        }
    }

    fn scatter(&mut self, x: &[SVector<f64, E>]) {
        let slots = &self.slots;
        let fields = &mut self.fields;
        for (name, slot) in slots.iter() {
            let off = slot.offset();
            if slot.components() == 3 {
                if let Some(field) = fields.vector_mut(name) {
                    for (cell, xc) in x.iter().enumerate() {
                        field.x[cell] = xc[off];
                        field.y[cell] = xc[off + 1];
                        field.z[cell] = xc[off + 2];
                    }
                }
            } else if let Some(values) = fields.scalar_mut(name) {
                for (cell, xc) in x.iter().enumerate() {
                    values[cell] = xc[off];
                }
            }
        }
    }

    /// Under `ClosedTransport` the trailing phase does not keep its solved
    /// value; it is overwritten with one minus the sum of the leading
    /// fractions.
    fn apply_phase_closure(&mut self) {
        if self.config.phase_fields_scheme != PhaseFieldsScheme::ClosedTransport || N == 0 {
            return;
        }
        let names = self.phases.field_names();
        let (leading, trailing) = names.split_at(names.len() - 1);

        let mut sums = vec![0.0; self.mesh.num_cells()];
        for name in leading {
            if let Some(values) = self.fields.scalar(name) {
                for (cell, &value) in values.iter().enumerate() {
                    sums[cell] += value;
                }
            }
        }
        if let Some(values) = self.fields.scalar_mut(&trailing[0]) {
            for (cell, value) in values.iter_mut().enumerate() {
                *value = 1.0 - sums[cell];
            }
        }
    }
}

impl<const N: usize, const E: usize> CoupledSystem for BlockSystem<N, E> {
    fn name(&self) -> String {
        canonical_name(N)
    }

    fn phase_count(&self) -> usize {
        N
    }

    fn n_eqns(&self) -> usize {
        E
    }

    fn phases(&self) -> &PhaseRoster {
        &self.phases
    }

    fn config(&self) -> &SystemConfig {
        &self.config
    }

    fn slots(&self) -> &SlotMap {
        &self.slots
    }

    fn fields(&self) -> &FieldStore {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }

    fn insert_scalar_equation(&mut self, eqn: &ScalarEquation) -> Result<(), SystemError> {
        let slot = self.scalar_slot(eqn.field())?;
        eqn.check_sizes(self.mesh.num_cells(), self.mesh.num_faces())?;
        self.registry.mark_inserted(eqn.field())?;

        let s = slot.offset();
        for (cell, (&d, &src)) in eqn.diag().iter().zip(eqn.source()).enumerate() {
            self.matrix.add_diag(cell, s, s, d);
            self.matrix.add_source(cell, s, src);
        }
        for (face, (&u, &l)) in eqn.upper().iter().zip(eqn.lower()).enumerate() {
            self.matrix.add_upper(face, s, s, u);
            self.matrix.add_lower(face, s, s, l);
        }
        Ok(())
    }

    fn insert_vector_equation(&mut self, eqn: &VectorEquation) -> Result<(), SystemError> {
        let slot = self.vector_slot(eqn.field())?;
        eqn.check_sizes(self.mesh.num_cells(), self.mesh.num_faces())?;
        self.registry.mark_inserted(eqn.field())?;

        let s = slot.offset();
        for (cell, (d, src)) in eqn.diag().iter().zip(eqn.source()).enumerate() {
            for c in 0..3 {
                self.matrix.add_diag(cell, s + c, s + c, d[c]);
                self.matrix.add_source(cell, s + c, src[c]);
            }
        }
        for (face, (&u, &l)) in eqn.upper().iter().zip(eqn.lower()).enumerate() {
            for c in 0..3 {
                self.matrix.add_upper(face, s + c, s + c, u);
                self.matrix.add_lower(face, s + c, s + c, l);
            }
        }
        Ok(())
    }

    fn insert_equation_coupling(
        &mut self,
        attached: &str,
        coupled: &str,
        coupling: &[f64],
    ) -> Result<(), SystemError> {
        let sa = self.scalar_slot(attached)?;
        let sb = self.scalar_slot(coupled)?;
        if coupling.len() != self.mesh.num_cells() {
            return Err(SystemError::SizeMismatch {
                what: "coupling coefficients",
                expected: self.mesh.num_cells(),
                found: coupling.len(),
            });
        }

        for (cell, &value) in coupling.iter().enumerate() {
            self.matrix.add_diag(cell, sa.offset(), sb.offset(), value);
        }
        Ok(())
    }

    fn insert_matrix_coupling(
        &mut self,
        attached: &str,
        coupled: &str,
        coupling: &ScalarEquation,
    ) -> Result<(), SystemError> {
        let sa = self.scalar_slot(attached)?;
        let sb = self.scalar_slot(coupled)?;
        coupling.check_sizes(self.mesh.num_cells(), self.mesh.num_faces())?;

        let (row, col) = (sa.offset(), sb.offset());
        for (cell, (&d, &src)) in coupling.diag().iter().zip(coupling.source()).enumerate() {
            self.matrix.add_diag(cell, row, col, d);
            self.matrix.add_source(cell, row, src);
        }
        for (face, (&u, &l)) in coupling.upper().iter().zip(coupling.lower()).enumerate() {
            self.matrix.add_upper(face, row, col, u);
            self.matrix.add_lower(face, row, col, l);
        }
        Ok(())
    }

    fn insert_vector_scalar_coupling(
        &mut self,
        attached: &str,
        coupled: &str,
        coupling: &VectorScalarCoupling,
    ) -> Result<(), SystemError> {
        let sa = self.scalar_slot(attached)?;
        let sb = self.vector_slot(coupled)?;
        coupling.check_sizes(self.mesh.num_cells(), self.mesh.num_faces())?;

        let (row, col) = (sa.offset(), sb.offset());
        for (cell, (d, &src)) in coupling.diag().iter().zip(coupling.source()).enumerate() {
            for c in 0..3 {
                self.matrix.add_diag(cell, row, col + c, d[c]);
            }
            self.matrix.add_source(cell, row, src);
        }
        for (face, (u, l)) in coupling.upper().iter().zip(coupling.lower()).enumerate() {
            for c in 0..3 {
                self.matrix.add_upper(face, row, col + c, u[c]);
                self.matrix.add_lower(face, row, col + c, l[c]);
            }
        }
        Ok(())
    }

    fn insert_vector_vector_coupling(
        &mut self,
        attached: &str,
        coupled: &str,
        coupling: &VectorVectorCoupling,
    ) -> Result<(), SystemError> {
        let sa = self.vector_slot(attached)?;
        let sb = self.scalar_slot(coupled)?;
        coupling.check_sizes(self.mesh.num_cells(), self.mesh.num_faces())?;

        let (row, col) = (sa.offset(), sb.offset());
        for (cell, (d, src)) in coupling.diag().iter().zip(coupling.source()).enumerate() {
            for c in 0..3 {
                self.matrix.add_diag(cell, row + c, col, d[c]);
                self.matrix.add_source(cell, row + c, src[c]);
            }
        }
        for (face, (u, l)) in coupling.upper().iter().zip(coupling.lower()).enumerate() {
            for c in 0..3 {
                self.matrix.add_upper(face, row + c, col, u[c]);
                self.matrix.add_lower(face, row + c, col, l[c]);
            }
        }
        Ok(())
    }

    fn update(&mut self) -> Result<bool, SystemError> {
        if !self.registry.is_complete() {
            return Err(SystemError::IncompleteSystem {
                missing: self.registry.missing(),
            });
        }
        if self.first_run {
            log::debug!(
                "{}: first assembly on {} cells / {} faces, {} equation rows per cell",
                canonical_name(N),
                self.mesh.num_cells(),
                self.mesh.num_faces(),
                E
            );
            self.first_run = false;
        }

        let mut x = vec![SVector::<f64, E>::zeros(); self.mesh.num_cells()];
        self.gather(&mut x);

        let controls = self.config.solver;
        let outcome = solve_coupled(
            &self.matrix,
            self.matrix.source(),
            &mut x,
            controls.max_iterations,
            controls.tolerance,
        );

        self.scatter(&x);
        self.apply_phase_closure();

        if outcome.converged {
            log::debug!(
                "{} converged in {} iterations (residual {:e})",
                canonical_name(N),
                outcome.iterations,
                outcome.final_residual
            );
        } else {
            log::warn!(
                "{} did not converge after {} iterations (residual {:e})",
                canonical_name(N),
                outcome.iterations,
                outcome.final_residual
            );
        }

        self.registry.reset();
        self.matrix.reset();
        self.last_outcome = Some(outcome);
        Ok(outcome.converged)
    }

    fn last_outcome(&self) -> Option<&SolveOutcome> {
        self.last_outcome.as_ref()
    }

    fn execute(&mut self, op: &mut SystemCallback) {
        op(self)
    }
}

impl<const N: usize, const E: usize> Persistent for BlockSystem<N, E> {
    fn write_data(&self, _out: &mut dyn io::Write) -> bool {
        false
    }
}
