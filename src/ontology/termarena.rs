use std::collections::hash_map::Values;
use std::collections::HashMap;

use crate::term::internal::GoTermInternal;
use crate::term::GoTermId;

#[derive(Default)]
pub(crate) struct Arena {
    terms: HashMap<GoTermId, GoTermInternal>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn insert(&mut self, term: GoTermInternal) {
        self.terms.insert(*term.id(), term);
    }

    pub fn get(&self, id: GoTermId) -> Option<&GoTermInternal> {
        self.terms.get(&id)
    }

    pub fn get_mut(&mut self, id: GoTermId) -> Option<&mut GoTermInternal> {
        self.terms.get_mut(&id)
    }

    pub fn contains(&self, id: GoTermId) -> bool {
        self.terms.contains_key(&id)
    }

    pub fn values(&self) -> Values<'_, GoTermId, GoTermInternal> {
        self.terms.values()
    }
}
