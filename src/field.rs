use indexmap::IndexMap;

/// Three-component vector field stored struct-of-arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl VectorField {
    pub fn zeros(n: usize) -> Self {
        Self {
            x: vec![0.0; n],
            y: vec![0.0; n],
            z: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FieldData {
    Scalar(Vec<f64>),
    Vector(VectorField),
}

/// Named per-cell solution storage for one system instance. The set of
/// fields and their kinds is fixed when the owning system is built; callers
/// only read and overwrite values.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStore {
    n_cells: usize,
    fields: IndexMap<String, FieldData>,
}

impl FieldStore {
    pub(crate) fn new(n_cells: usize) -> Self {
        Self {
            n_cells,
            fields: IndexMap::new(),
        }
    }

    pub(crate) fn insert_scalar(&mut self, name: &str) {
        self.fields
            .insert(name.to_string(), FieldData::Scalar(vec![0.0; self.n_cells]));
    }

    pub(crate) fn insert_vector(&mut self, name: &str) {
        self.fields.insert(
            name.to_string(),
            FieldData::Vector(VectorField::zeros(self.n_cells)),
        );
    }

    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(|name| name.as_str())
    }

    pub fn scalar(&self, name: &str) -> Option<&[f64]> {
        match self.fields.get(name) {
            Some(FieldData::Scalar(values)) => Some(values),
            _ => None,
        }
    }

    pub fn scalar_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        match self.fields.get_mut(name) {
            Some(FieldData::Scalar(values)) => Some(values),
            _ => None,
        }
    }

    pub fn vector(&self, name: &str) -> Option<&VectorField> {
        match self.fields.get(name) {
            Some(FieldData::Vector(field)) => Some(field),
            _ => None,
        }
    }

    pub fn vector_mut(&mut self, name: &str) -> Option<&mut VectorField> {
        match self.fields.get_mut(name) {
            Some(FieldData::Vector(field)) => Some(field),
            _ => None,
        }
    }
}
