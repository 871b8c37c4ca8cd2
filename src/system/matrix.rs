use nalgebra::{SMatrix, SVector};

use crate::mesh::Mesh;

/// Assembled block system in LDU form: one `E x E` diagonal block per cell,
/// one upper and one lower block per interior face, and an `E`-row source
/// vector per cell. The matrix carries its own copy of the face addressing,
/// so a solver needs nothing beyond the matrix and a right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMatrix<const E: usize> {
    diag: Vec<SMatrix<f64, E, E>>,
    upper: Vec<SMatrix<f64, E, E>>,
    lower: Vec<SMatrix<f64, E, E>>,
    source: Vec<SVector<f64, E>>,
    face_owner: Vec<usize>,
    face_neighbor: Vec<usize>,
}

impl<const E: usize> BlockMatrix<E> {
    pub fn new(mesh: &Mesh) -> Self {
        Self {
            diag: vec![SMatrix::zeros(); mesh.num_cells()],
            upper: vec![SMatrix::zeros(); mesh.num_faces()],
            lower: vec![SMatrix::zeros(); mesh.num_faces()],
            source: vec![SVector::zeros(); mesh.num_cells()],
            face_owner: mesh.face_owner().to_vec(),
            face_neighbor: mesh.face_neighbor().to_vec(),
        }
    }

    pub fn num_cells(&self) -> usize {
        self.diag.len()
    }

    pub fn num_faces(&self) -> usize {
        self.upper.len()
    }

    pub fn diag(&self) -> &[SMatrix<f64, E, E>] {
        &self.diag
    }

    pub fn upper(&self) -> &[SMatrix<f64, E, E>] {
        &self.upper
    }

    pub fn lower(&self) -> &[SMatrix<f64, E, E>] {
        &self.lower
    }

    pub fn source(&self) -> &[SVector<f64, E>] {
        &self.source
    }

    pub fn add_diag(&mut self, cell: usize, row: usize, col: usize, value: f64) {
        self.diag[cell][(row, col)] += value;
    }

    pub fn add_source(&mut self, cell: usize, row: usize, value: f64) {
        self.source[cell][row] += value;
    }

    pub fn add_upper(&mut self, face: usize, row: usize, col: usize, value: f64) {
        self.upper[face][(row, col)] += value;
    }

    pub fn add_lower(&mut self, face: usize, row: usize, col: usize, value: f64) {
        self.lower[face][(row, col)] += value;
    }

    /// Zeroes every coefficient while keeping the allocation and the
    /// addressing, so one matrix is reused across assembly cycles.
    pub fn reset(&mut self) {
        for block in &mut self.diag {
            block.fill(0.0);
        }
        for block in &mut self.upper {
            block.fill(0.0);
        }
        for block in &mut self.lower {
            block.fill(0.0);
        }
        for row in &mut self.source {
            row.fill(0.0);
        }
    }

    /// y = A x over the LDU structure.
    pub fn mul_vec(&self, x: &[SVector<f64, E>], y: &mut [SVector<f64, E>]) {
        assert_eq!(x.len(), self.diag.len());
        assert_eq!(y.len(), self.diag.len());
        for (i, block) in self.diag.iter().enumerate() {
            y[i] = block * x[i];
        }
        for face in 0..self.upper.len() {
            let owner = self.face_owner[face];
            let neighbor = self.face_neighbor[face];
            y[owner] += self.upper[face] * x[neighbor];
            y[neighbor] += self.lower[face] * x[owner];
        }
    }
}
