//! Attribute dependency resolution: scan formulas into a graph, order it, evaluate it.

pub mod evaluator;
pub mod graph;
pub mod order;
pub mod plan;
pub(crate) mod references;

use crate::foundation::error::TimelineResult;
use crate::scene::model::Project;

pub use graph::{DependencyGraph, NodeKind, ResolvedValues};
pub use plan::{PlanStep, ResolutionPlan};

/// Resolve every formula attribute of `project` into a concrete value.
///
/// `project` is never modified; the resolved copy is returned on success. Any failure (invalid
/// element names, a cycle, a missing or null dependency, a rejected expression) aborts the whole
/// pass.
#[tracing::instrument(skip(project), fields(elements = project.elements.len()))]
pub fn resolve(project: &Project) -> TimelineResult<Project> {
    project.validate()?;
    let (graph, values) = graph::build(project);
    tracing::debug!(
        nodes = graph.len(),
        seeded = values.len(),
        "dependency graph built"
    );
    evaluator::run(project, &graph, values)
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/resolve.rs"]
mod tests;
