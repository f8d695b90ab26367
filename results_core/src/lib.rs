//! # results_core - Member Results Extraction & Envelope Engine
//!
//! `results_core` reads pre-solved analysis results for structural members
//! and reduces them to design values:
//!
//! - the governing signed extreme and its position for each of ten response
//!   channels, per span and loading
//! - optional station profiles at evenly spaced points along a span
//! - running envelopes across the spans of a *lift* (spans joined by fully
//!   moment-continuous connections)
//!
//! Everything reported is in US display units (kip, kip-ft, in, ft).
//!
//! ## Design Philosophy
//!
//! - **Injected host**: the analysis application sits behind the async
//!   traits in [`provider`]; [`snapshot`] implements them from JSON
//! - **Degrade to zero**: missing analysis data yields zero results, not errors
//! - **JSON-First**: all inputs and outputs implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use results_core::lifts::segment;
//! use results_core::model::{Member, MemberConstruction, Span, SpanReleases};
//!
//! let column = Member::new("C1", MemberConstruction::TimberColumn)
//!     .with_span(Span::new(0, "Level 1", 3048.0).with_end_releases(SpanReleases::fixed()))
//!     .with_span(Span::new(1, "Level 2", 2438.4).with_start_releases(SpanReleases::fixed()));
//!
//! let lifts = segment(&column);
//! assert_eq!(lifts.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Base-to-display unit conversion
//! - [`channel`] - The ten response channels and their query descriptors
//! - [`model`] - Members, spans, end releases and loadings
//! - [`provider`] - Host application boundary
//! - [`sampler`] - Value of a channel at one exact position
//! - [`extrema`] - Governing extremes of a channel on a span
//! - [`stations`] - Evenly spaced station profiles
//! - [`envelope`] - Span envelopes and composite envelopes
//! - [`lifts`] - Fixity-based lift segmentation
//! - [`extraction`] - Whole-model extraction runs
//! - [`settings`] - Run configuration
//! - [`snapshot`] - JSON model snapshots
//! - [`logging`] - Injected diagnostic logging
//! - [`errors`] - Structured error types

pub mod channel;
pub mod envelope;
pub mod errors;
pub mod extraction;
pub mod extrema;
pub mod lifts;
pub mod logging;
pub mod model;
pub mod provider;
pub mod sampler;
pub mod settings;
pub mod snapshot;
pub mod stations;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use channel::Channel;
pub use envelope::{CompositeEnvelope, SpanEnvelope};
pub use errors::{ResultsError, ResultsResult};
pub use extraction::{run_extraction, AbortFlag, ExtractionReport};
pub use extrema::ExtremaResult;
pub use lifts::Lift;
pub use settings::ExtractionSettings;
pub use snapshot::ModelSnapshot;
