use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use timeline_resolver::{
    Document, HydrateOpts, JsonCompositor, PipelineOpts, ResolutionPlan, SystemProber,
};

#[derive(Parser, Debug)]
#[command(name = "timeline-resolver", version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve every formula and write the concrete project as JSON.
    Resolve(ResolveArgs),
    /// Print the evaluation order without evaluating anything.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Input project document (YAML or JSON).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Skip media probing; absent attributes stay absent.
    #[arg(long)]
    no_hydrate: bool,

    /// Worker threads for media probing.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input project document (YAML or JSON).
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_project(path: &Path) -> anyhow::Result<timeline_resolver::Project> {
    let doc = Document::from_path(path)
        .with_context(|| format!("load project '{}'", path.display()))?;
    Ok(doc.into_project())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;

    let assets_root = args
        .in_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let opts = PipelineOpts {
        hydrate: !args.no_hydrate,
        hydrate_opts: HydrateOpts {
            assets_root,
            threads: args.threads,
        },
    };

    let mut compositor = JsonCompositor::new(&args.out);
    let report = timeline_resolver::run_pipeline(&project, &SystemProber, &mut compositor, &opts)
        .with_context(|| format!("resolve '{}'", args.in_path.display()))?;

    if let Some(h) = &report.hydrate {
        tracing::info!(
            probed = h.probed,
            filled = h.filled,
            failed = h.failures.len(),
            "media hydration"
        );
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    project.validate()?;
    let plan = ResolutionPlan::build(&project)
        .with_context(|| format!("plan '{}'", args.in_path.display()))?;

    for step in plan.steps() {
        if step.deps.is_empty() {
            println!("{}", step.id);
        } else {
            let deps: Vec<String> = step.deps.iter().map(ToString::to_string).collect();
            println!("{} <- {}", step.id, deps.join(", "));
        }
    }
    Ok(())
}
