//! Package statistics layer
//!
//! Fetches package metadata and download statistics from the remote APIs and
//! reduces them to the data shown on the summary card and the charts.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registries │────▶│   Report    │────▶│  Reconcile  │
//! │ (npm, jsDel)│     │ (Visualizer)│     │ (join/sort) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │ PackageInfo │
//!                     │  (summary)  │
//!                     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Traits for the remote sources
//! - [`registries`]: HTTP implementations (npm, jsDelivr, bundlephobia/packagephobia)
//! - [`reconcile`]: Joins publish times with download counts
//! - [`semver`]: Version triplet parsing and stability checks
//! - [`package_info`]: Summary card data derived from the registry document
//! - [`report`]: Orchestrates the fetches for a single search
//! - [`error`]: Error types for registry and report operations
//! - [`types`]: Payload and series types

pub mod error;
pub mod package_info;
pub mod reconcile;
pub mod registries;
pub mod registry;
pub mod report;
pub mod semver;
pub mod types;
