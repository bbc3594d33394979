use std::path::{Path, PathBuf};

use crate::assets::hydrate::{HydrateOpts, HydrateReport, hydrate};
use crate::assets::media::MediaProber;
use crate::foundation::error::TimelineResult;
use crate::resolve::resolve;
use crate::scene::document::Document;
use crate::scene::model::Project;

/// Consumer of a fully resolved project (renderer, exporter, test capture).
pub trait Compositor {
    /// Called at most once per pipeline run, and only with a fully resolved project.
    fn compose(&mut self, project: &Project) -> TimelineResult<()>;
}

/// Writes the resolved project as a pretty-printed JSON document (`{"video": ...}`).
#[derive(Debug, Clone)]
pub struct JsonCompositor {
    out: PathBuf,
}

impl JsonCompositor {
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self { out: out.into() }
    }

    pub fn path(&self) -> &Path {
        &self.out
    }
}

impl Compositor for JsonCompositor {
    fn compose(&mut self, project: &Project) -> TimelineResult<()> {
        Document::new(project.clone()).write_json_path(&self.out)?;
        tracing::info!(out = %self.out.display(), "resolved project written");
        Ok(())
    }
}

/// In-memory compositor for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryCompositor {
    projects: Vec<Project>,
}

impl InMemoryCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every project composed so far, oldest first.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn last(&self) -> Option<&Project> {
        self.projects.last()
    }
}

impl Compositor for InMemoryCompositor {
    fn compose(&mut self, project: &Project) -> TimelineResult<()> {
        self.projects.push(project.clone());
        Ok(())
    }
}

#[derive(Clone, Debug)]
/// Options for [`run_pipeline`].
pub struct PipelineOpts {
    /// Probe media for absent attributes before resolving.
    pub hydrate: bool,
    pub hydrate_opts: HydrateOpts,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            hydrate: true,
            hydrate_opts: HydrateOpts::default(),
        }
    }
}

/// What a successful pipeline run did besides composing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineReport {
    /// `None` when hydration was disabled.
    pub hydrate: Option<HydrateReport>,
}

/// Hydrate (optional), resolve, then hand the resolved project to `compositor`.
///
/// `project` is not modified. Hydration runs to completion before resolution starts, and a failed
/// resolve returns before the compositor is called.
#[tracing::instrument(skip(project, prober, compositor))]
pub fn run_pipeline(
    project: &Project,
    prober: &dyn MediaProber,
    compositor: &mut dyn Compositor,
    opts: &PipelineOpts,
) -> TimelineResult<PipelineReport> {
    let mut report = PipelineReport::default();

    let resolved = if opts.hydrate {
        let mut hydrated = project.clone();
        let h = hydrate(&mut hydrated, prober, &opts.hydrate_opts)?;
        if !h.is_clean() {
            tracing::warn!(
                failed = h.failures.len(),
                "some media could not be probed; affected attributes stay absent"
            );
        }
        report.hydrate = Some(h);
        resolve(&hydrated)?
    } else {
        resolve(project)?
    };

    compositor.compose(&resolved)?;
    Ok(report)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
