use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::assets::media::{MediaInfo, MediaKind, MediaProber};
use crate::foundation::error::{TimelineError, TimelineResult};
use crate::foundation::ids::AttrName;
use crate::scene::model::{Element, Project, Resolvable};
use crate::scene::value::AttrValue;

#[derive(Clone, Debug, Default)]
/// Options for [`hydrate`].
pub struct HydrateOpts {
    /// Base directory for relative media paths.
    pub assets_root: PathBuf,
    /// Optional worker count override. `None` uses rayon's default pool size.
    pub threads: Option<usize>,
}

/// An element whose media could not be probed. Its attributes were left untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct HydrateFailure {
    pub element: String,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HydrateReport {
    /// Elements the prober was consulted for.
    pub probed: usize,
    /// Attributes written.
    pub filled: usize,
    pub failures: Vec<HydrateFailure>,
}

impl HydrateReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Outcome {
    Skipped,
    Filled(usize),
    Failed(HydrateFailure),
}

/// Fill absent media attributes from probed metadata.
///
/// Only `Null` attributes are written; formulas and literals are never overwritten. Probe failures
/// are logged and collected in the report, never returned as errors. Elements are processed in
/// parallel and the call returns once every element has settled.
#[tracing::instrument(skip(project, prober), fields(elements = project.elements.len()))]
pub fn hydrate(
    project: &mut Project,
    prober: &dyn MediaProber,
    opts: &HydrateOpts,
) -> TimelineResult<HydrateReport> {
    let pool = build_thread_pool(opts.threads)?;
    let root = opts.assets_root.as_path();

    let outcomes: Vec<Outcome> = pool.install(|| {
        project
            .elements
            .par_iter_mut()
            .map(|el| hydrate_element(el, prober, root))
            .collect()
    });

    let mut report = HydrateReport::default();
    for o in outcomes {
        match o {
            Outcome::Skipped => {}
            Outcome::Filled(n) => {
                report.probed += 1;
                report.filled += n;
            }
            Outcome::Failed(f) => {
                report.probed += 1;
                report.failures.push(f);
            }
        }
    }
    tracing::debug!(
        probed = report.probed,
        filled = report.filled,
        failed = report.failures.len(),
        "hydration finished"
    );
    Ok(report)
}

/// Attributes a media kind can supply, in fill order.
fn fillable(kind: MediaKind) -> &'static [AttrName] {
    match kind {
        MediaKind::Image => &[
            AttrName::Width,
            AttrName::Height,
            AttrName::MediaWidth,
            AttrName::MediaHeight,
        ],
        MediaKind::Video => &[
            AttrName::Width,
            AttrName::Height,
            AttrName::MediaWidth,
            AttrName::MediaHeight,
            AttrName::MediaDuration,
        ],
        MediaKind::Audio => &[AttrName::MediaDuration],
    }
}

fn hydrate_element(el: &mut Element, prober: &dyn MediaProber, root: &Path) -> Outcome {
    let Some(kind) = MediaKind::of(el.kind()) else {
        return Outcome::Skipped;
    };
    let Some(rel) = el.media_path() else {
        return Outcome::Skipped;
    };
    let targets = fillable(kind);
    if !targets.iter().any(|a| el.attr(*a).is_some_and(AttrValue::is_null)) {
        return Outcome::Skipped;
    }

    let path = root.join(rel);
    match prober.probe(&path, kind) {
        Ok(info) => {
            let mut n = 0;
            for &a in targets {
                n += usize::from(fill(el, a, &info));
            }
            tracing::debug!(element = el.name(), filled = n, "hydrated");
            Outcome::Filled(n)
        }
        Err(e) => {
            tracing::warn!(
                element = el.name(),
                path = %path.display(),
                error = %e,
                "media probe failed; attributes left absent"
            );
            Outcome::Failed(HydrateFailure {
                element: el.name().to_owned(),
                path,
                reason: e.to_string(),
            })
        }
    }
}

fn fill(el: &mut Element, attr: AttrName, info: &MediaInfo) -> bool {
    let probed = match attr {
        AttrName::Width | AttrName::MediaWidth => info.width.map(f64::from),
        AttrName::Height | AttrName::MediaHeight => info.height.map(f64::from),
        AttrName::MediaDuration => info.duration_sec,
        _ => None,
    };
    let Some(v) = probed else {
        return false;
    };
    match el.attr_mut(attr) {
        Some(slot) if slot.is_null() => {
            *slot = AttrValue::Number(v);
            true
        }
        _ => false,
    }
}

fn build_thread_pool(threads: Option<usize>) -> TimelineResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TimelineError::validation(
            "hydrate 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TimelineError::resolver(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/hydrate.rs"]
mod tests;
