//! firemap_rs
//!
//! A lightweight Rust library for ingesting, normalizing, styling, and
//! filtering fire-station service-area and incident geodata. Pairs with the
//! `firemap` CLI.
//!
//! ### Features
//! - Normalize the three upstream export families (GeoJSON
//!   FeatureCollection, bare feature sets, multi-layer wrappers) into one
//!   canonical feature list
//! - Reproject Web-Mercator coordinates into geographic latitude/longitude
//! - Resolve each feature's owning station across inconsistent schemas and
//!   derive its deterministic style
//! - Keep rendered features consistent with the active-station selection
//!   and the shown layer groups, and aggregate legend state
//!
//! ### Example
//! ```no_run
//! use firemap_rs::{fetch::Client, registry::MapContext, sources};
//!
//! let client = Client::default();
//! let mut ctx = MapContext::new();
//! let root = sources::SourceRoot::parse("./data");
//! let layers = sources::load_all(&mut ctx, &root, &client);
//! for layer in &layers {
//!     println!("{}: {} features", layer.label, ctx.registry.group(layer.group).features().len());
//! }
//! ```

pub mod attrs;
pub mod error;
pub mod fetch;
pub mod heat;
pub mod layers;
pub mod legend;
pub mod models;
pub mod normalize;
pub mod project;
pub mod registry;
pub mod sources;
pub mod stats;
pub mod storage;
pub mod style;

pub use error::SourceError;
pub use fetch::Client;
pub use models::{LatLng, NormalizedFeatureSet, StationId};
pub use registry::{FilterOp, MapContext, VisibilityRegistry};
