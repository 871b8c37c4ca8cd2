use nalgebra::Vector3;

use super::error::SystemError;

fn check_len(what: &'static str, found: usize, expected: usize) -> Result<(), SystemError> {
    if found != expected {
        return Err(SystemError::SizeMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Discretized scalar transport equation in LDU coefficient form: one
/// diagonal and source entry per cell, one upper and lower coefficient per
/// interior face. Produced by physics code, consumed by insertion, never
/// retained by the system.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarEquation {
    field: String,
    diag: Vec<f64>,
    source: Vec<f64>,
    upper: Vec<f64>,
    lower: Vec<f64>,
}

impl ScalarEquation {
    pub fn new(field: impl Into<String>, n_cells: usize, n_faces: usize) -> Self {
        Self {
            field: field.into(),
            diag: vec![0.0; n_cells],
            source: vec![0.0; n_cells],
            upper: vec![0.0; n_faces],
            lower: vec![0.0; n_faces],
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn diag(&self) -> &[f64] {
        &self.diag
    }

    pub fn diag_mut(&mut self) -> &mut [f64] {
        &mut self.diag
    }

    pub fn source(&self) -> &[f64] {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut [f64] {
        &mut self.source
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn upper_mut(&mut self) -> &mut [f64] {
        &mut self.upper
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn lower_mut(&mut self) -> &mut [f64] {
        &mut self.lower
    }

    pub(crate) fn check_sizes(&self, n_cells: usize, n_faces: usize) -> Result<(), SystemError> {
        check_len("scalar equation diagonal", self.diag.len(), n_cells)?;
        check_len("scalar equation source", self.source.len(), n_cells)?;
        check_len("scalar equation upper coefficients", self.upper.len(), n_faces)?;
        check_len("scalar equation lower coefficients", self.lower.len(), n_faces)?;
        Ok(())
    }
}

/// Discretized vector transport equation. The diagonal and source carry one
/// value per component; the face coefficients are shared by all three
/// components, which is the shape a componentwise-identical discretization
/// produces.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorEquation {
    field: String,
    diag: Vec<Vector3<f64>>,
    source: Vec<Vector3<f64>>,
    upper: Vec<f64>,
    lower: Vec<f64>,
}

impl VectorEquation {
    pub fn new(field: impl Into<String>, n_cells: usize, n_faces: usize) -> Self {
        Self {
            field: field.into(),
            diag: vec![Vector3::zeros(); n_cells],
            source: vec![Vector3::zeros(); n_cells],
            upper: vec![0.0; n_faces],
            lower: vec![0.0; n_faces],
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn diag(&self) -> &[Vector3<f64>] {
        &self.diag
    }

    pub fn diag_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.diag
    }

    pub fn source(&self) -> &[Vector3<f64>] {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.source
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn upper_mut(&mut self) -> &mut [f64] {
        &mut self.upper
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn lower_mut(&mut self) -> &mut [f64] {
        &mut self.lower
    }

    pub(crate) fn check_sizes(&self, n_cells: usize, n_faces: usize) -> Result<(), SystemError> {
        check_len("vector equation diagonal", self.diag.len(), n_cells)?;
        check_len("vector equation source", self.source.len(), n_cells)?;
        check_len("vector equation upper coefficients", self.upper.len(), n_faces)?;
        check_len("vector equation lower coefficients", self.lower.len(), n_faces)?;
        Ok(())
    }
}

/// One scalar equation row spanning the three columns of a vector unknown,
/// the shape an implicit divergence term takes. Coefficients are one vector
/// per cell or face; the source adds into the scalar row.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorScalarCoupling {
    diag: Vec<Vector3<f64>>,
    source: Vec<f64>,
    upper: Vec<Vector3<f64>>,
    lower: Vec<Vector3<f64>>,
}

impl VectorScalarCoupling {
    pub fn new(n_cells: usize, n_faces: usize) -> Self {
        Self {
            diag: vec![Vector3::zeros(); n_cells],
            source: vec![0.0; n_cells],
            upper: vec![Vector3::zeros(); n_faces],
            lower: vec![Vector3::zeros(); n_faces],
        }
    }

    pub fn diag(&self) -> &[Vector3<f64>] {
        &self.diag
    }

    pub fn diag_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.diag
    }

    pub fn source(&self) -> &[f64] {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut [f64] {
        &mut self.source
    }

    pub fn upper(&self) -> &[Vector3<f64>] {
        &self.upper
    }

    pub fn upper_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.upper
    }

    pub fn lower(&self) -> &[Vector3<f64>] {
        &self.lower
    }

    pub fn lower_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.lower
    }

    pub(crate) fn check_sizes(&self, n_cells: usize, n_faces: usize) -> Result<(), SystemError> {
        check_len("coupling diagonal", self.diag.len(), n_cells)?;
        check_len("coupling source", self.source.len(), n_cells)?;
        check_len("coupling upper coefficients", self.upper.len(), n_faces)?;
        check_len("coupling lower coefficients", self.lower.len(), n_faces)?;
        Ok(())
    }
}

/// Three vector-equation rows against a single scalar column, the shape an
/// implicit pressure-gradient term takes. Coefficients are one vector per
/// cell or face; the source adds into the three vector rows.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorVectorCoupling {
    diag: Vec<Vector3<f64>>,
    source: Vec<Vector3<f64>>,
    upper: Vec<Vector3<f64>>,
    lower: Vec<Vector3<f64>>,
}

impl VectorVectorCoupling {
    pub fn new(n_cells: usize, n_faces: usize) -> Self {
        Self {
            diag: vec![Vector3::zeros(); n_cells],
            source: vec![Vector3::zeros(); n_cells],
            upper: vec![Vector3::zeros(); n_faces],
            lower: vec![Vector3::zeros(); n_faces],
        }
    }

    pub fn diag(&self) -> &[Vector3<f64>] {
        &self.diag
    }

    pub fn diag_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.diag
    }

    pub fn source(&self) -> &[Vector3<f64>] {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.source
    }

    pub fn upper(&self) -> &[Vector3<f64>] {
        &self.upper
    }

    pub fn upper_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.upper
    }

    pub fn lower(&self) -> &[Vector3<f64>] {
        &self.lower
    }

    pub fn lower_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.lower
    }

    pub(crate) fn check_sizes(&self, n_cells: usize, n_faces: usize) -> Result<(), SystemError> {
        check_len("coupling diagonal", self.diag.len(), n_cells)?;
        check_len("coupling source", self.source.len(), n_cells)?;
        check_len("coupling upper coefficients", self.upper.len(), n_faces)?;
        check_len("coupling lower coefficients", self.lower.len(), n_faces)?;
        Ok(())
    }
}
