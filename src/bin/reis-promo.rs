use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reis_promo::{
    AudioMap, FrameIndex, FrameRange, JsonLinesSink, Registry, RenderSession, RenderSessionOpts,
};

#[derive(Parser, Debug)]
#[command(name = "reis-promo", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered compositions.
    List,
    /// Evaluate a single frame and write its snapshot as JSON.
    Frame(FrameArgs),
    /// Evaluate every frame and stream snapshots as JSON lines.
    Render(RenderArgs),
    /// Print the audio cue sheet of a composition.
    Cues(CuesArgs),
}

#[derive(Parser, Debug)]
struct CompArgs {
    /// Registered composition id (see `list`).
    #[arg(long)]
    comp: String,

    /// Props as an inline JSON object.
    #[arg(long)]
    props: Option<String>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    comp: CompArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output JSON path. Prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    comp: CompArgs,

    /// Output JSON lines path.
    #[arg(long)]
    out: PathBuf,

    /// Evaluate frames on a rayon pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Also write the audio cue sheet to this path.
    #[arg(long)]
    cues: Option<PathBuf>,

    /// JSON object overriding audio asset paths per key.
    #[arg(long)]
    audio_map: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CuesArgs {
    #[command(flatten)]
    comp: CompArgs,

    /// JSON object overriding audio asset paths per key.
    #[arg(long)]
    audio_map: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = Registry::builtin();
    match cli.cmd {
        Command::List => cmd_list(&registry),
        Command::Frame(args) => cmd_frame(&registry, args),
        Command::Render(args) => cmd_render(&registry, args),
        Command::Cues(args) => cmd_cues(&registry, args),
    }
}

fn open_session(
    registry: &Registry,
    args: &CompArgs,
    opts: RenderSessionOpts,
) -> anyhow::Result<RenderSession> {
    let entry = registry.lookup(&args.comp)?;
    let props: Option<serde_json::Value> = args
        .props
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .with_context(|| format!("parse --props for '{}'", args.comp))?;
    let session = RenderSession::new(entry, props.as_ref(), opts)
        .with_context(|| format!("prepare composition '{}'", args.comp))?;
    Ok(session)
}

fn read_audio_map(path: Option<&Path>) -> anyhow::Result<AudioMap> {
    let Some(path) = path else {
        return Ok(AudioMap::default());
    };
    let f = File::open(path).with_context(|| format!("open audio map '{}'", path.display()))?;
    let map = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse audio map '{}'", path.display()))?;
    Ok(map)
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_list(registry: &Registry) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for entry in registry.iter() {
        let m = &entry.meta;
        writeln!(
            out,
            "{:<24} {}x{} @ {} fps  {} frames",
            m.id,
            m.canvas.width,
            m.canvas.height,
            m.fps.as_f64(),
            m.duration
        )?;
    }
    Ok(())
}

fn cmd_frame(registry: &Registry, args: FrameArgs) -> anyhow::Result<()> {
    let session = open_session(registry, &args.comp, RenderSessionOpts::default())?;
    let snap = session.render_frame(FrameIndex(args.frame))?;
    match &args.out {
        Some(path) => {
            create_parent(path)?;
            let f = File::create(path)
                .with_context(|| format!("create snapshot '{}'", path.display()))?;
            serde_json::to_writer_pretty(f, &snap)
                .with_context(|| format!("write snapshot '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &snap)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn cmd_render(registry: &Registry, args: RenderArgs) -> anyhow::Result<()> {
    let map = read_audio_map(args.audio_map.as_deref())?;
    let opts = RenderSessionOpts {
        parallel: args.parallel,
        threads: args.threads,
        ..RenderSessionOpts::default()
    };
    let session = open_session(registry, &args.comp, opts)?;
    let range = FrameRange::full(session.duration());

    let mut sink = JsonLinesSink::create(&args.out)?;
    let stats = session.render_range(range, &mut sink)?;
    sink.into_inner()?;
    eprintln!(
        "wrote {} ({} frames, {} changed)",
        args.out.display(),
        stats.frames_total,
        stats.frames_changed
    );

    if let Some(path) = &args.cues {
        let manifest = session.audio_manifest(range, &map)?;
        create_parent(path)?;
        let f =
            File::create(path).with_context(|| format!("create cue sheet '{}'", path.display()))?;
        serde_json::to_writer_pretty(f, &manifest)
            .with_context(|| format!("write cue sheet '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_cues(registry: &Registry, args: CuesArgs) -> anyhow::Result<()> {
    let map = read_audio_map(args.audio_map.as_deref())?;
    let session = open_session(registry, &args.comp, RenderSessionOpts::default())?;
    let range = FrameRange::full(session.duration());
    let manifest = session.audio_manifest(range, &map)?;
    let fps = session.meta().fps;

    let mut out = std::io::stdout().lock();
    for cue in &manifest.entries {
        writeln!(
            out,
            "{:>5}..{:<5} {:>7.3}s  {:<12} vol {:.2}  trim {:<3} {}  ({})",
            cue.start_frame,
            cue.end_frame,
            cue.offset_secs(range, fps),
            cue.key,
            cue.volume,
            cue.trim_frames,
            cue.asset,
            cue.node
        )?;
    }
    Ok(())
}
