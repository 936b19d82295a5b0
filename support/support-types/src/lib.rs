//! Core types for resin support generation.
//!
//! This crate provides the vocabulary shared by every stage of the support
//! pipeline:
//!
//! - **Support points**: contact locations on the model, tagged with the
//!   detector that produced them and the size tier they are later assigned
//!   ([`SupportPoint`], [`SourceType`], [`Tier`])
//! - **Paths**: ordered waypoints from the contact point down to the build
//!   plate or a tower top ([`SupportPath`])
//! - **Configuration**: one immutable [`SupportConfig`] tree handed to every
//!   component, plus printer and resin presets ([`PrinterProfile`],
//!   [`ResinProfile`])
//! - **Errors**: [`SupportError`]
//!
//! # Example
//!
//! ```
//! use support_types::{SupportConfig, SupportPoint, SourceType, Tier};
//! use nalgebra::Point3;
//!
//! let config = SupportConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let point = SupportPoint::new(Point3::new(0.0, 0.0, 10.0), SourceType::Island)
//!     .with_area(4.0)
//!     .with_tier(Tier::Heavy);
//! assert!((point.weight() - 4.0).abs() < 1e-12);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod path;
pub mod point;
pub mod profile;

pub use config::{
    CollisionConfig, LatticeConfig, OptimizerConfig, RoutingConfig, SupportConfig, SweepConfig,
    TierDiameters,
};
pub use error::{SupportError, SupportResult};
pub use path::SupportPath;
pub use point::{SourceType, SupportPoint, Tier};
pub use profile::{PrinterProfile, ResinProfile};
