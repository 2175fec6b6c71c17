//! driftnorm - drift normalization pipeline
//!
//! Rewrites the observed (cloud) and declared (IaC) resource lists so a diff
//! engine only sees real drift: provider defaults are suppressed, implicit
//! child resources are declared, and duplicate API-generation listings are
//! collapsed.

pub mod config;
pub mod matcher;
pub mod output;
pub mod pipeline;
pub mod resource;
pub mod snapshot;

mod error;

pub use error::DriftError;
pub use matcher::{GlobMatcher, PathMatcher, PatternError};
pub use pipeline::{Pipeline, PipelineOptions, RunReport, Stage, StageError};
pub use resource::{
    Attributes, DefaultResourceFactory, FactoryError, Resource, ResourceFactory, is_same_resource,
};
