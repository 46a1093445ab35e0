//! # Routable Registry
//!
//! Maps a wire type code to the factory of a given protocol generation and
//! frames every payload as `[type_code: i32][payload]`.
//!
//! The registry owns immutable generation tables only. It is built once at
//! startup and shared by reference or `Arc`; any number of threads may encode
//! and decode through it at the same time.
//!
//! ## Errors
//! - Encoding a routable the generation has no binding for is
//!   `UnsupportedTypeForVersion`.
//! - Decoding a type code the generation has no binding for is
//!   `UnknownTypeCode`.
//! - Bytes left over once the factory has finished are `MalformedValue`, and
//!   so is a payload that decodes to a routable of another type code.
//! - A frame over the size limit is `OversizedEncode` going out and
//!   `OversizedMessage` coming in.
//!
//! Errors are returned to the caller and never logged here.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, trace};

use crate::config::{ProtocolConfig, MAX_MESSAGE_SIZE};
use crate::core::buffer::{ByteBuffer, GrowableByteBuffer};
use crate::core::repo::DocumentTypeRepo;
use crate::error::{ProtocolError, Result};
use crate::protocol::factory_set::FactorySet;
use crate::protocol::generation::Generation;
use crate::protocol::routable::Routable;
use crate::protocol::standard;

/// Size of the type code prefix in front of every payload
pub const TYPE_CODE_SIZE: usize = 4;

/// Immutable collection of generation tables with envelope handling
#[derive(Debug, Clone)]
pub struct RoutableRegistry {
    sets: BTreeMap<Generation, Arc<FactorySet>>,
    default_generation: Generation,
    max_message_size: usize,
}

impl RoutableRegistry {
    /// Build a registry whose default generation is the newest one given
    pub fn new<I>(sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = FactorySet>,
    {
        let mut tables = BTreeMap::new();
        for set in sets {
            let generation = set.generation();
            if tables.insert(generation, Arc::new(set)).is_some() {
                return Err(ProtocolError::FactoryBinding(format!(
                    "generation {generation} registered twice"
                )));
            }
        }

        let default_generation = match tables.keys().next_back() {
            Some(latest) => *latest,
            None => {
                return Err(ProtocolError::FactoryBinding(
                    "registry needs at least one generation".to_string(),
                ))
            }
        };

        info!(
            generations = ?tables.keys().map(|g| g.number()).collect::<Vec<_>>(),
            default_generation = default_generation.number(),
            "Routable registry ready"
        );

        Ok(Self {
            sets: tables,
            default_generation,
            max_message_size: MAX_MESSAGE_SIZE,
        })
    }

    /// Build a registry with the default generation and size limit of `config`.
    ///
    /// An invalid `config` is a `ConfigError`.
    pub fn with_config<I>(sets: I, config: &ProtocolConfig) -> Result<Self>
    where
        I: IntoIterator<Item = FactorySet>,
    {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ProtocolError::ConfigError(format!(
                "Protocol configuration rejected:\n  - {}",
                errors.join("\n  - ")
            )));
        }
        let mut registry = Self::new(sets)?;
        let generation = Generation::new(config.default_generation);
        if !registry.sets.contains_key(&generation) {
            return Err(ProtocolError::UnsupportedGeneration(generation));
        }
        registry.default_generation = generation;
        registry.max_message_size = config.max_message_size;
        Ok(registry)
    }

    /// Registry over every standard generation
    pub fn standard(repo: Arc<dyn DocumentTypeRepo>) -> Result<Self> {
        Self::new(standard::all_generations(repo)?)
    }

    pub fn default_generation(&self) -> Generation {
        self.default_generation
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Registered generations, oldest first
    pub fn generations(&self) -> impl Iterator<Item = Generation> + '_ {
        self.sets.keys().copied()
    }

    pub fn latest_generation(&self) -> Generation {
        // `new` refuses an empty table set
        self.sets
            .keys()
            .next_back()
            .copied()
            .unwrap_or(self.default_generation)
    }

    pub fn factory_set(&self, generation: Generation) -> Option<&FactorySet> {
        self.sets.get(&generation).map(Arc::as_ref)
    }

    /// Whether `generation` has a binding for `type_code`
    pub fn supports(&self, type_code: i32, generation: Generation) -> bool {
        self.factory_set(generation)
            .is_some_and(|set| set.contains(type_code))
    }

    fn table(&self, generation: Generation) -> Result<&FactorySet> {
        self.factory_set(generation)
            .ok_or(ProtocolError::UnsupportedGeneration(generation))
    }

    /// Encode with the default generation
    pub fn encode(&self, routable: &Routable) -> Result<Bytes> {
        self.encode_routable(routable, self.default_generation)
    }

    /// Decode with the default generation
    pub fn decode(&self, bytes: &[u8]) -> Result<Routable> {
        self.decode_routable(bytes, self.default_generation)
    }

    pub fn encode_routable(&self, routable: &Routable, generation: Generation) -> Result<Bytes> {
        let mut out = GrowableByteBuffer::new();
        self.encode_routable_into(routable, generation, &mut out)?;
        Ok(out.freeze())
    }

    /// Append one framed routable to `out`.
    ///
    /// On failure `out` is truncated back to its length before the call.
    pub fn encode_routable_into(
        &self,
        routable: &Routable,
        generation: Generation,
        out: &mut GrowableByteBuffer,
    ) -> Result<()> {
        let set = self.table(generation)?;
        let type_code = routable.type_code();
        let factory = set
            .get(type_code)
            .ok_or(ProtocolError::UnsupportedTypeForVersion {
                type_code,
                generation,
            })?;

        let start = out.len();
        out.write_i32(type_code);
        if let Err(e) = factory.encode(routable, out) {
            out.truncate(start);
            return Err(e);
        }

        let size = out.len() - start;
        if size > self.max_message_size {
            out.truncate(start);
            return Err(ProtocolError::OversizedEncode {
                size,
                max: self.max_message_size,
            });
        }

        trace!(
            type_code,
            generation = generation.number(),
            factory = factory.name(),
            size,
            "Encoded routable"
        );
        Ok(())
    }

    pub fn decode_routable(&self, bytes: &[u8], generation: Generation) -> Result<Routable> {
        if bytes.len() > self.max_message_size {
            return Err(ProtocolError::OversizedMessage {
                size: bytes.len(),
                max: self.max_message_size,
            });
        }

        let set = self.table(generation)?;
        let mut input = ByteBuffer::new(bytes);
        let type_code = input.read_i32()?;
        let factory = set
            .get(type_code)
            .ok_or(ProtocolError::UnknownTypeCode {
                type_code,
                generation,
            })?;

        let routable = factory.decode(&mut input)?;
        if routable.type_code() != type_code {
            return Err(ProtocolError::MalformedValue(format!(
                "{} decoded type code {} from a frame tagged {type_code}",
                factory.name(),
                routable.type_code()
            )));
        }
        if !input.is_exhausted() {
            return Err(ProtocolError::MalformedValue(format!(
                "{} trailing bytes after {} payload in generation {generation}",
                input.remaining(),
                factory.name()
            )));
        }

        trace!(
            type_code,
            generation = generation.number(),
            factory = factory.name(),
            size = bytes.len(),
            "Decoded routable"
        );
        Ok(routable)
    }
}
