//! anamnesis-insights
//!
//! Derives a session's insight from its answers. Library consumed by the
//! session-management layer once a session completes.
//!
//! Public API:
//! - `InsightGenerator`: rule-based and mock-varied strategies
//! - `InsightCache`: no-op and in-memory TTL backends
//! - `InsightRepository`: in-memory and S3-backed persistence
//! - `InsightPipeline::derive_insight()`: hash → reuse → generate → persist

use std::future::Future;
use std::pin::Pin;

pub mod cache;
pub mod error;
pub mod generator;
pub mod generators;
pub mod pipeline;
pub mod repository;
pub mod s3_repository;

pub use crate::cache::{InsightCache, MemoryCache, NoopCache, DEFAULT_CACHE_TTL};
pub use crate::error::{CacheError, GeneratorError, PipelineError, RepositoryError};
pub use crate::generator::{generator_for, GeneratorKind, InsightGenerator};
pub use crate::pipeline::{Derivation, InsightPipeline, InsightSource};
pub use crate::repository::{InsightRepository, MemoryRepository};
pub use crate::s3_repository::S3InsightRepository;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
