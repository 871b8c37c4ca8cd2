/// Cell connectivity in owner/neighbour (LDU) form. Only interior faces are
/// stored; each face keeps the lower-numbered cell as owner, so upper
/// coefficients always act owner-to-neighbour and lower coefficients
/// neighbour-to-owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    n_cells: usize,
    face_owner: Vec<usize>,
    face_neighbor: Vec<usize>,
}

impl Mesh {
    pub fn new(n_cells: usize, faces: &[(usize, usize)]) -> Result<Self, String> {
        let mut face_owner = Vec::with_capacity(faces.len());
        let mut face_neighbor = Vec::with_capacity(faces.len());
        for &(a, b) in faces {
            if a >= n_cells || b >= n_cells {
                return Err(format!(
                    "face ({}, {}) references a cell outside 0..{}",
                    a, b, n_cells
                ));
            }
            if a == b {
                return Err(format!("face connects cell {} to itself", a));
            }
            let (owner, neighbor) = if a < b { (a, b) } else { (b, a) };
            face_owner.push(owner);
            face_neighbor.push(neighbor);
        }
        Ok(Self {
            n_cells,
            face_owner,
            face_neighbor,
        })
    }

    /// 1-D chain of `n` cells with a face between each consecutive pair.
    pub fn line(n: usize) -> Self {
        Self {
            n_cells: n,
            face_owner: (0..n.saturating_sub(1)).collect(),
            face_neighbor: (1..n).collect(),
        }
    }

    pub fn num_cells(&self) -> usize {
        self.n_cells
    }

    pub fn num_faces(&self) -> usize {
        self.face_owner.len()
    }

    pub fn owner(&self, face: usize) -> usize {
        self.face_owner[face]
    }

    pub fn neighbor(&self, face: usize) -> usize {
        self.face_neighbor[face]
    }

    pub fn face_owner(&self) -> &[usize] {
        &self.face_owner
    }

    pub fn face_neighbor(&self) -> &[usize] {
        &self.face_neighbor
    }
}
