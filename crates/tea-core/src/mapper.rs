//! The attribute-mapper seam and the set of mappers a combiner runs.

use std::sync::Arc;

use crate::attribute::{Attribute, PerAttribute};
use crate::compound::CompoundMapper;
use crate::config::ConfigSource;
use crate::element::ElementDistribution;
use crate::flavor::FlavorMapper;
use crate::geography::GeographyMapper;
use crate::processing::ProcessingMapper;
use crate::record::TeaRecord;
use crate::tables::LookupTables;

/// Converts one attribute class of a tea into an element distribution.
///
/// Returns `None` only when the record carries no usable input for this
/// class; that is what excludes the class from weighting. Every returned
/// distribution is a fresh value.
pub trait AttributeMapper: Send + Sync {
    fn attribute(&self) -> Attribute;

    fn map(&self, tea: &TeaRecord, config: &dyn ConfigSource) -> Option<ElementDistribution>;
}

/// One mapper per attribute class.
pub struct MapperSet {
    mappers: PerAttribute<Box<dyn AttributeMapper>>,
}

impl MapperSet {
    /// The four built-in mappers over shared tables.
    pub fn new(tables: Arc<LookupTables>) -> Self {
        Self {
            mappers: PerAttribute {
                flavor: Box::new(FlavorMapper::new(Arc::clone(&tables))),
                compounds: Box::new(CompoundMapper::new()),
                processing: Box::new(ProcessingMapper::new(Arc::clone(&tables))),
                geography: Box::new(GeographyMapper::new(tables)),
            },
        }
    }

    /// Replace the mapper for whichever class `mapper` reports.
    pub fn with_mapper(mut self, mapper: Box<dyn AttributeMapper>) -> Self {
        let slot = mapper.attribute();
        self.mappers[slot] = mapper;
        self
    }

    pub fn get(&self, attribute: Attribute) -> &dyn AttributeMapper {
        self.mappers[attribute].as_ref()
    }

    pub fn map_all(
        &self,
        tea: &TeaRecord,
        config: &dyn ConfigSource,
    ) -> PerAttribute<Option<ElementDistribution>> {
        PerAttribute::from_fn(|a| {
            self.mappers[a].map(tea, config).map(|mut d| {
                d.clamp_non_negative();
                d
            })
        })
    }
}

impl Default for MapperSet {
    fn default() -> Self {
        Self::new(Arc::new(LookupTables::builtin()))
    }
}
