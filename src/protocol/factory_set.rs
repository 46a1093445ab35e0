//! # Versioned Factory Sets
//!
//! A factory set is the type-code table of one protocol generation. A newer
//! generation is derived from its predecessor by copying every binding and
//! then replacing, adding or retiring a few entries. The result is plain
//! data: [`FactorySet::diff`] shows exactly what changed between two
//! generations.
//!
//! ## Usage
//! ```rust
//! use document_protocol::protocol::factories::{EmptyReplyFactory, GetDocumentMessageFactory};
//! use document_protocol::protocol::factory_set::FactorySet;
//! use document_protocol::protocol::generation::Generation;
//! use document_protocol::protocol::routable::type_code;
//!
//! # fn main() -> document_protocol::Result<()> {
//! let v50 = FactorySet::builder(Generation::V50)
//!     .add(type_code::GET_DOCUMENT, GetDocumentMessageFactory)?
//!     .build()?;
//!
//! let v51 = v50
//!     .derive(Generation::V51)
//!     .add(type_code::DOCUMENT_IGNORED_REPLY, EmptyReplyFactory::document_ignored())?
//!     .build()?;
//!
//! assert_eq!(v51.diff(&v50).added, vec![type_code::DOCUMENT_IGNORED_REPLY]);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::protocol::factory::RoutableFactory;
use crate::protocol::generation::Generation;

/// Factory handle shared between generation tables
pub type SharedFactory = Arc<dyn RoutableFactory>;

/// Immutable type code -> factory table for one generation
#[derive(Clone)]
pub struct FactorySet {
    generation: Generation,
    bindings: BTreeMap<i32, SharedFactory>,
}

impl FactorySet {
    /// Start an empty table
    pub fn builder(generation: Generation) -> FactorySetBuilder {
        FactorySetBuilder {
            generation,
            base: None,
            bindings: BTreeMap::new(),
        }
    }

    /// Start a newer table holding every binding of this one
    pub fn derive(&self, generation: Generation) -> FactorySetBuilder {
        FactorySetBuilder {
            generation,
            base: Some(self.generation),
            bindings: self.bindings.clone(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn get(&self, type_code: i32) -> Option<&SharedFactory> {
        self.bindings.get(&type_code)
    }

    pub fn contains(&self, type_code: i32) -> bool {
        self.bindings.contains_key(&type_code)
    }

    /// Bound type codes in ascending order
    pub fn type_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.bindings.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// What changed going from `older` to this table.
    ///
    /// A binding counts as replaced when the two tables hold different
    /// factory instances for the same type code.
    pub fn diff(&self, older: &FactorySet) -> GenerationDiff {
        let mut diff = GenerationDiff::default();
        for (code, factory) in &self.bindings {
            match older.bindings.get(code) {
                None => diff.added.push(*code),
                Some(previous) if !same_factory(previous, factory) => diff.replaced.push(*code),
                Some(_) => {}
            }
        }
        diff.retired = older
            .bindings
            .keys()
            .filter(|code| !self.bindings.contains_key(code))
            .copied()
            .collect();
        diff
    }
}

impl fmt::Debug for FactorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactorySet")
            .field("generation", &self.generation)
            .field(
                "bindings",
                &self
                    .bindings
                    .iter()
                    .map(|(code, factory)| (*code, factory.name()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn same_factory(a: &SharedFactory, b: &SharedFactory) -> bool {
    // compare data addresses only; vtable pointers are not unique
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Differences between two generation tables, each list in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationDiff {
    pub added: Vec<i32>,
    pub replaced: Vec<i32>,
    pub retired: Vec<i32>,
}

impl GenerationDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.replaced.is_empty() && self.retired.is_empty()
    }
}

/// Builder for a [`FactorySet`]
pub struct FactorySetBuilder {
    generation: Generation,
    base: Option<Generation>,
    bindings: BTreeMap<i32, SharedFactory>,
}

impl FactorySetBuilder {
    /// Bind a type code that has no factory yet
    pub fn add<F>(self, type_code: i32, factory: F) -> Result<Self>
    where
        F: RoutableFactory + 'static,
    {
        self.add_shared(type_code, Arc::new(factory))
    }

    pub fn add_shared(mut self, type_code: i32, factory: SharedFactory) -> Result<Self> {
        self.check_handles(type_code, &factory)?;
        if let Some(existing) = self.bindings.get(&type_code) {
            return Err(ProtocolError::FactoryBinding(format!(
                "type code {type_code} already bound to {} in generation {}",
                existing.name(),
                self.generation
            )));
        }
        self.bindings.insert(type_code, factory);
        Ok(self)
    }

    /// Swap the factory of a type code that is already bound
    pub fn replace<F>(self, type_code: i32, factory: F) -> Result<Self>
    where
        F: RoutableFactory + 'static,
    {
        self.replace_shared(type_code, Arc::new(factory))
    }

    pub fn replace_shared(mut self, type_code: i32, factory: SharedFactory) -> Result<Self> {
        self.check_handles(type_code, &factory)?;
        match self.bindings.get_mut(&type_code) {
            Some(slot) => {
                *slot = factory;
                Ok(self)
            }
            None => Err(ProtocolError::FactoryBinding(format!(
                "type code {type_code} is not bound in generation {}, nothing to replace",
                self.generation
            ))),
        }
    }

    /// A slot only accepts the factory for its own type code
    fn check_handles(&self, type_code: i32, factory: &SharedFactory) -> Result<()> {
        if factory.type_code() != type_code {
            return Err(ProtocolError::FactoryBinding(format!(
                "{} handles type code {}, cannot bind it to {type_code} in generation {}",
                factory.name(),
                factory.type_code(),
                self.generation
            )));
        }
        Ok(())
    }

    /// Remove a type code from the table
    pub fn retire(mut self, type_code: i32) -> Result<Self> {
        if self.bindings.remove(&type_code).is_none() {
            return Err(ProtocolError::FactoryBinding(format!(
                "type code {type_code} is not bound in generation {}, nothing to retire",
                self.generation
            )));
        }
        Ok(self)
    }

    pub fn build(self) -> Result<FactorySet> {
        if let Some(base) = self.base {
            if self.generation <= base {
                return Err(ProtocolError::FactoryBinding(format!(
                    "generation {} must be newer than the generation {base} it derives from",
                    self.generation
                )));
            }
        }
        debug!(
            generation = self.generation.number(),
            base = self.base.map(Generation::number),
            bindings = self.bindings.len(),
            "Factory set built"
        );
        Ok(FactorySet {
            generation: self.generation,
            bindings: self.bindings,
        })
    }
}
