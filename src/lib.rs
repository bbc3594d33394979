//! Timeline resolver turns declarative video projects with symbolic attributes into concrete ones.
//!
//! An attribute may hold a formula (`"expr: video.width - 100"`) instead of a number. Resolution
//! is a single deterministic pass:
//!
//! - Load a [`Project`] from a YAML/JSON [`Document`]
//! - Optionally [`hydrate`] absent media attributes through a [`MediaProber`]
//! - [`resolve`] every formula in dependency order inside a restricted arithmetic sandbox
//! - Hand the result to a [`Compositor`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod expression;
pub mod foundation;
pub mod pipeline;
pub mod resolve;
pub mod scene;

pub use crate::foundation::error::{TimelineError, TimelineResult};
pub use crate::foundation::ids::{AttrId, AttrName, Owner};

pub use crate::assets::hydrate::{HydrateFailure, HydrateOpts, HydrateReport, hydrate};
pub use crate::assets::media::{MediaInfo, MediaKind, MediaProber, SystemProber};
pub use crate::expression::error::{InvalidExpression, InvalidReason};
pub use crate::expression::sandbox::{Context, Value, evaluate};
pub use crate::pipeline::{
    Compositor, InMemoryCompositor, JsonCompositor, PipelineOpts, PipelineReport, run_pipeline,
};
pub use crate::resolve::{ResolutionPlan, resolve};
pub use crate::scene::document::{Document, DocumentFormat};
pub use crate::scene::model::{Element, ElementKind, Layer, Project, Resolvable};
pub use crate::scene::value::{AttrValue, Formula};
