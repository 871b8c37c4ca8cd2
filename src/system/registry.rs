use indexmap::IndexMap;

use super::error::SystemError;

/// Tracks which per-field equations were inserted during the current
/// assembly cycle. Completion gates the solve; the set is reset after every
/// `update` so each cycle starts empty. Coupling insertions never mark
/// completion, only the per-field equations do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationRegistry {
    inserted: IndexMap<String, bool>,
}

impl EquationRegistry {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inserted: required.into_iter().map(|name| (name.into(), false)).collect(),
        }
    }

    /// Marks one field's equation as inserted. The same field cannot be
    /// marked twice in one cycle; the flag clears on reset.
    pub fn mark_inserted(&mut self, field: &str) -> Result<(), SystemError> {
        match self.inserted.get_mut(field) {
            None => Err(SystemError::UnknownField {
                field: field.to_string(),
            }),
            Some(flag) if *flag => Err(SystemError::DuplicateEquation {
                field: field.to_string(),
            }),
            Some(flag) => {
                *flag = true;
                Ok(())
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.inserted.values().all(|&flag| flag)
    }

    pub fn is_inserted(&self, field: &str) -> Option<bool> {
        self.inserted.get(field).copied()
    }

    /// Fields still missing their equation, in slot order.
    pub fn missing(&self) -> Vec<String> {
        self.inserted
            .iter()
            .filter(|(_, &flag)| !flag)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn reset(&mut self) {
        for flag in self.inserted.values_mut() {
            *flag = false;
        }
    }

    pub fn len(&self) -> usize {
        self.inserted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
    }
}
