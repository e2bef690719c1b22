use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use scenelink::{Fragment, Frame, ResolveOpts, ResolvedMaterial, ScaleMode, ValidateOpts, Viewport};

#[derive(Parser, Debug)]
#[command(name = "scenelink", version)]
struct Cli {
    /// Log resolution details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a frame (or fragment) and print the result as JSON.
    Validate(ValidateArgs),
    /// Inline every embed of a frame and write the resolved JSON.
    Resolve(ResolveArgs),
    /// Wrap a fragment into a standalone frame, then resolve it.
    Preview(PreviewArgs),
    /// Resolve a frame and list the shapes a renderer would paint.
    Draws(DrawsArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Treat the input as a fragment instead of a frame.
    #[arg(long)]
    fragment: bool,

    /// Maximum tree depth.
    #[arg(long, default_value_t = scenelink::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Input frame JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Maximum tree depth.
    #[arg(long, default_value_t = scenelink::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input fragment JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, default_value_t = 100.0)]
    half_width: f64,

    #[arg(long, default_value_t = 100.0)]
    half_height: f64,

    #[arg(long, value_enum, default_value_t = ScaleModeChoice::Fit)]
    scale_mode: ScaleModeChoice,

    /// Fill of the synthetic root material.
    #[arg(long, default_value = "#000000")]
    fill: String,

    /// Stroke of the synthetic root material.
    #[arg(long, default_value = "#ffffff")]
    stroke: String,

    #[arg(long, default_value_t = 1.0)]
    stroke_width: f64,

    /// Id given to the synthetic root material.
    #[arg(long, default_value = scenelink::DEFAULT_ROOT_ID)]
    root_id: String,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DrawsArgs {
    /// Input frame JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScaleModeChoice {
    Fit,
    Fill,
    Stretch,
}

impl From<ScaleModeChoice> for ScaleMode {
    fn from(c: ScaleModeChoice) -> Self {
        match c {
            ScaleModeChoice::Fit => ScaleMode::Fit,
            ScaleModeChoice::Fill => ScaleMode::Fill,
            ScaleModeChoice::Stretch => ScaleMode::Stretch,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Resolve(args) => cmd_resolve(args).map(|()| ExitCode::SUCCESS),
        Command::Preview(args) => cmd_preview(args).map(|()| ExitCode::SUCCESS),
        Command::Draws(args) => cmd_draws(args).map(|()| ExitCode::SUCCESS),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_frame(path: &Path, max_depth: usize) -> anyhow::Result<Frame> {
    Frame::from_path_with_max_depth(path, max_depth)
        .with_context(|| format!("load frame '{}'", path.display()))
}

fn read_fragment(path: &Path, max_depth: usize) -> anyhow::Result<Fragment> {
    Fragment::from_path_with_max_depth(path, max_depth)
        .with_context(|| format!("load fragment '{}'", path.display()))
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("write '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "wrote resolved frame");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("write stdout")?;
        }
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    let opts = ValidateOpts {
        max_depth: args.max_depth,
    };
    let res = if args.fragment {
        let fragment = read_fragment(&args.in_path, args.max_depth)?;
        scenelink::validate_fragment_with_opts(&fragment, opts)
    } else {
        let frame = read_frame(&args.in_path, args.max_depth)?;
        scenelink::validate_frame_with_opts(&frame, opts)
    };

    println!("{}", serde_json::to_string(&res)?);
    Ok(if res.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Validate, resolve and re-validate; the resolved frame is returned only if both checks pass.
fn resolve_checked(frame: &Frame, max_depth: usize) -> anyhow::Result<Frame> {
    scenelink::validate_frame_with_opts(frame, ValidateOpts { max_depth })
        .into_result()
        .context("input frame is invalid")?;
    let resolved = scenelink::resolve_frame_with_opts(frame, ResolveOpts { max_depth })?;
    scenelink::validate_frame(&resolved)
        .into_result()
        .context("resolved frame is invalid")?;
    Ok(resolved)
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let frame = read_frame(&args.in_path, args.max_depth)?;
    let resolved = resolve_checked(&frame, args.max_depth)?;
    write_output(args.out.as_deref(), &resolved.to_json_pretty()?)
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let fragment = read_fragment(&args.in_path, scenelink::DEFAULT_MAX_DEPTH)?;
    scenelink::validate_fragment(&fragment)
        .into_result()
        .context("input fragment is invalid")?;

    let viewport = Viewport {
        half_width: args.half_width,
        half_height: args.half_height,
        scale_mode: args.scale_mode.into(),
    };
    let material = ResolvedMaterial::new(args.fill, args.stroke, args.stroke_width);
    let frame =
        scenelink::fragment_to_frame_with_root_id(&fragment, viewport, &material, &args.root_id);

    let resolved = resolve_checked(&frame, scenelink::DEFAULT_MAX_DEPTH)?;
    write_output(args.out.as_deref(), &resolved.to_json_pretty()?)
}

fn cmd_draws(args: DrawsArgs) -> anyhow::Result<()> {
    let frame = read_frame(&args.in_path, scenelink::DEFAULT_MAX_DEPTH)?;
    let resolved = resolve_checked(&frame, scenelink::DEFAULT_MAX_DEPTH)?;
    let list = scenelink::build_draw_list(&resolved)?;

    let mut stdout = std::io::stdout().lock();
    match list.clear {
        Some(c) => writeln!(stdout, "clear {},{},{},{}", c.r, c.g, c.b, c.a)?,
        None => writeln!(stdout, "clear none")?,
    }
    for item in &list.items {
        let [a, b, c, d, e, f] = item.transform.as_coeffs();
        writeln!(
            stdout,
            "{} fill={} stroke={} width={} matrix=[{a},{b},{c},{d},{e},{f}]",
            item.shape.kind(),
            item.material.fill,
            item.material.stroke,
            item.material.stroke_width,
        )?;
    }
    Ok(())
}
