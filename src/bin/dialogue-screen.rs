use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use dialogue_screen::{
    CpuSurface, DialogueType, DrawSurface, FrameRGBA, Language, LayoutTable, RecordingSurface,
    RenderOutcome, Scene, ScreenComposer, TextureCache,
};

#[derive(Parser, Debug)]
#[command(name = "dialogue-screen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene file as a PNG.
    Render(RenderArgs),
    /// Print dialogue text with line breaks inserted for a mode and language.
    Wrap(WrapArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Assets root containing `images/` and `fonts/`.
    #[arg(long, env = "DIALOGUE_SCREEN_ASSETS", default_value = ".")]
    assets: PathBuf,

    /// Also write a downscaled preview PNG.
    #[arg(long)]
    preview_out: Option<PathBuf>,

    /// Preview width in pixels; height keeps the canvas aspect ratio.
    #[arg(long, default_value_t = 300)]
    preview_width: u32,

    /// Replace the built-in layout table.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Print the draw calls as JSON instead of rasterizing.
    #[arg(long, default_value_t = false)]
    dump_draws: bool,
}

#[derive(Parser, Debug)]
struct WrapArgs {
    /// Dialogue text, annotations included.
    #[arg(long)]
    text: String,

    /// Presentation mode (dialogue, intro, caption, narration, full, book).
    #[arg(long, default_value = "dialogue")]
    mode: DialogueType,

    /// Language code (en, ja, zh_tw, zh_cn).
    #[arg(long, default_value = "en")]
    lang: Language,

    /// Assets root containing `fonts/`.
    #[arg(long, env = "DIALOGUE_SCREEN_ASSETS", default_value = ".")]
    assets: PathBuf,

    /// Replace the built-in layout table.
    #[arg(long)]
    layout: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Wrap(args) => cmd_wrap(args),
    }
}

fn load_layout(path: Option<&Path>) -> anyhow::Result<LayoutTable> {
    let table = match path {
        Some(path) => LayoutTable::from_path(path)?,
        None => LayoutTable::builtin()?,
    };
    Ok(table)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = Scene::load(&args.scene)?;
    let layout = load_layout(args.layout.as_deref())?;
    let textures = TextureCache::from_dir(args.assets.join("images"));

    if args.dump_draws {
        let surface = RecordingSurface::new(
            dialogue_screen::CANVAS_WIDTH,
            dialogue_screen::CANVAS_HEIGHT,
        );
        let composer = ScreenComposer::new(surface, textures, layout);
        check_outcome(composer.render(&scene.settings, &scene.layers, None))?;
        let calls = composer.with_surface(|s| s.take_calls());
        let json = serde_json::to_string_pretty(&calls).context("serialize draw calls")?;
        println!("{json}");
        return Ok(());
    }

    let surface = CpuSurface::screen()?.with_font_dir(args.assets.join("fonts"));
    let composer = ScreenComposer::new(surface, textures, layout);

    let mut preview = args.preview_out.as_ref().map(|_| {
        let (w, h) = composer.with_surface(|s| (s.width(), s.height()));
        let pw = args.preview_width.max(1);
        let ph = ((u64::from(h) * u64::from(pw)) / u64::from(w.max(1))).max(1) as u32;
        FrameRGBA::new_transparent(pw, ph)
    });

    check_outcome(composer.render(&scene.settings, &scene.layers, preview.as_mut()))?;

    composer.snapshot()?.write_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());

    if let (Some(path), Some(frame)) = (&args.preview_out, &preview) {
        frame.write_png(path)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn check_outcome(outcome: RenderOutcome) -> anyhow::Result<()> {
    match outcome {
        RenderOutcome::Rendered => Ok(()),
        other => anyhow::bail!("render did not complete: {other:?}"),
    }
}

fn cmd_wrap(args: WrapArgs) -> anyhow::Result<()> {
    let layout = load_layout(args.layout.as_deref())?;
    let surface = CpuSurface::screen()?.with_font_dir(args.assets.join("fonts"));
    let textures = TextureCache::from_dir(args.assets.join("images"));
    let composer = ScreenComposer::new(surface, textures, layout);

    let wrapped = composer
        .wrap(&args.text, args.mode, args.lang)
        .with_context(|| format!("wrap text for '{}' in {} mode", args.lang, args.mode))?;
    println!("{wrapped}");
    Ok(())
}
