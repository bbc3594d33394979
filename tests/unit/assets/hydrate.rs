use std::collections::HashMap;
use std::sync::Mutex;

use super::*;

/// Answers from a fixed table keyed by file name; records every probed path.
#[derive(Default)]
struct FakeProber {
    table: HashMap<String, MediaInfo>,
    seen: Mutex<Vec<PathBuf>>,
}

impl FakeProber {
    fn with(mut self, file: &str, info: MediaInfo) -> Self {
        self.table.insert(file.to_owned(), info);
        self
    }

    fn seen(&self) -> Vec<PathBuf> {
        let mut v = self.seen.lock().unwrap().clone();
        v.sort();
        v
    }
}

impl MediaProber for FakeProber {
    fn probe(&self, path: &Path, _kind: MediaKind) -> TimelineResult<MediaInfo> {
        self.seen.lock().unwrap().push(path.to_path_buf());
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        self.table
            .get(name)
            .copied()
            .ok_or_else(|| TimelineError::media(format!("cannot open '{}'", path.display())))
    }
}

fn info(w: u32, h: u32, d: Option<f64>) -> MediaInfo {
    MediaInfo {
        width: Some(w),
        height: Some(h),
        duration_sec: d,
    }
}

#[test]
fn fills_only_absent_attributes() {
    let prober = FakeProber::default()
        .with("logo.png", info(400, 200, None))
        .with("clip.mp4", info(1280, 720, Some(12.5)))
        .with("music.mp3", MediaInfo {
            width: None,
            height: None,
            duration_sec: Some(30.0),
        });
    let mut p = Project::new(1920, 1080, 10)
        .with_element(Element::image("logo", "logo.png").with(AttrName::Width, 100))
        .with_element(
            Element::video("clip", "clip.mp4").with(AttrName::Height, "expr: self.width / 2"),
        )
        .with_element(Element::audio("music", "music.mp3"))
        .with_element(Element::rectangle("box"));

    let report = hydrate(&mut p, &prober, &HydrateOpts::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.probed, 3);

    let logo = p.element("logo").unwrap();
    assert_eq!(logo.attr(AttrName::Width), Some(&AttrValue::Number(100.0)));
    assert_eq!(logo.attr(AttrName::Height), Some(&AttrValue::Number(200.0)));
    assert_eq!(logo.attr(AttrName::MediaWidth), Some(&AttrValue::Number(400.0)));
    assert_eq!(logo.attr(AttrName::MediaDuration), Some(&AttrValue::Null));

    let clip = p.element("clip").unwrap();
    assert_eq!(clip.attr(AttrName::Width), Some(&AttrValue::Number(1280.0)));
    assert_eq!(
        clip.attr(AttrName::Height),
        Some(&AttrValue::formula("self.width / 2"))
    );
    assert_eq!(clip.attr(AttrName::MediaDuration), Some(&AttrValue::Number(12.5)));

    let music = p.element("music").unwrap();
    assert_eq!(music.attr(AttrName::MediaDuration), Some(&AttrValue::Number(30.0)));
    assert_eq!(music.attr(AttrName::Width), Some(&AttrValue::Null));

    // 3 image + 4 video + 1 audio
    assert_eq!(report.filled, 8);
}

#[test]
fn probe_failures_are_reported_not_fatal() {
    let prober = FakeProber::default();
    let mut p = Project::new(1, 1, 1).with_element(Element::image("ghost", "ghost.png"));
    let before = p.clone();

    let report = hydrate(&mut p, &prober, &HydrateOpts::default()).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].element, "ghost");
    assert!(report.failures[0].reason.contains("cannot open"));
    assert_eq!(p, before);
}

#[test]
fn fully_specified_elements_are_not_probed() {
    let prober = FakeProber::default();
    let mut p = Project::new(1, 1, 1).with_element(
        Element::audio("a", "a.wav").with(AttrName::MediaDuration, 3),
    );
    let report = hydrate(&mut p, &prober, &HydrateOpts::default()).unwrap();
    assert_eq!(report, HydrateReport::default());
    assert!(prober.seen().is_empty());
}

#[test]
fn relative_paths_resolve_against_assets_root() {
    let prober = FakeProber::default().with("logo.png", info(1, 1, None));
    let mut p = Project::new(1, 1, 1)
        .with_element(Element::image("logo", "img/logo.png"))
        .with_element(Element::image("abs", "/srv/media/logo.png"));
    let opts = HydrateOpts {
        assets_root: PathBuf::from("project"),
        threads: Some(2),
    };
    hydrate(&mut p, &prober, &opts).unwrap();
    assert_eq!(
        prober.seen(),
        vec![
            PathBuf::from("/srv/media/logo.png"),
            PathBuf::from("project/img/logo.png"),
        ]
    );
}

#[test]
fn zero_threads_is_rejected() {
    let mut p = Project::new(1, 1, 1);
    let opts = HydrateOpts {
        threads: Some(0),
        ..HydrateOpts::default()
    };
    let err = hydrate(&mut p, &FakeProber::default(), &opts).unwrap_err();
    assert!(matches!(err, TimelineError::Validation(_)));
}
