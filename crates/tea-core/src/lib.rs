//! Five-element tea scoring engine.
//!
//! Turns heterogeneous tea attributes (flavor descriptors, caffeine and
//! L-theanine levels, processing tags, growing conditions) into a normalized
//! wood/fire/earth/metal/water distribution plus a thermal scalar.
//!
//! Zero I/O: lookup tables and configuration are injected, never global.

mod builtin;

pub mod attribute;
pub mod batch;
pub mod combiner;
pub mod compound;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod diminishing;
pub mod element;
pub mod flavor;
pub mod geography;
pub mod interaction;
pub mod mapper;
pub mod numeric;
pub mod processing;
pub mod record;
pub mod serde_compat;
pub mod tables;
pub mod thermal;
pub mod time;

pub use attribute::{Attribute, PerAttribute};
pub use batch::{BatchSummary, analyze_batch, summarize};
pub use combiner::{AnalysisStatus, Combiner, ElementAnalysis, resolve_weights};
pub use compound::{CompoundAnalysis, CompoundMapper, RatioBand, analyze_compounds};
pub use config::{ConfigError, ConfigSource, DefaultConfig, EngineConfig};
pub use constants::{EPSILON, UNIFORM_SHARE};
pub use diminishing::DiminishingReturns;
pub use element::{Element, ElementDistribution};
pub use flavor::{FlavorMapper, FlavorResolution, ProfileMapping, ResolutionSource};
pub use geography::GeographyMapper;
pub use interaction::InteractionGraph;
pub use mapper::{AttributeMapper, MapperSet};
pub use numeric::WeightMode;
pub use processing::{ProcessingMapper, ProcessingMapping, ProcessingResolution};
pub use record::{Geography, TeaRecord};
pub use serde_compat::{CURRENT_VERSION, WireExport, export_json, import_records};
pub use tables::{LookupTables, ProcessingCategory, TcmFlavor};
pub use thermal::{ThermalAnalysis, ThermalBand, ThermalEngine, classify};
