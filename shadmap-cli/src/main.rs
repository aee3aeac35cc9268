use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shadmap::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shadmap")]
#[command(about = "Shadcn-styled map tooling")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the style document a map container would hand to the engine
    Style {
        #[arg(long, value_enum, default_value_t = Mode::Auto)]
        mode: Mode,
        /// Colour preference used by the `auto` mode
        #[arg(long, value_enum, default_value_t = Scheme::Light)]
        scheme: Scheme,
        /// PMTiles archive backing the basemap
        #[arg(long)]
        tiles: Option<String>,
        /// Map options file; `--tiles` and `--mode` override its values
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Drive a headless map container through a full lifecycle
    Demo {
        #[arg(long, default_value = "https://demo-bucket.protomaps.com/v4.pmtiles")]
        tiles: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Auto,
    Dark,
    Light,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scheme {
    Light,
    Dark,
}

impl From<Scheme> for ColorScheme {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Light => ColorScheme::Light,
            Scheme::Dark => ColorScheme::Dark,
        }
    }
}

impl From<Mode> for StyleMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Auto => StyleMode::Auto,
            Mode::Dark => StyleMode::Dark,
            Mode::Light => StyleMode::Light,
        }
    }
}

fn main() -> Result<()> {
    shadmap::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Style {
            mode,
            scheme,
            tiles,
            config,
            compact,
        } => print_style(mode, scheme, tiles, config, compact),
        Command::Demo { tiles } => run_demo(&tiles),
    }
}

fn print_style(
    mode: Mode,
    scheme: Scheme,
    tiles: Option<String>,
    config: Option<PathBuf>,
    compact: bool,
) -> Result<()> {
    let mut options = match &config {
        Some(path) => MapOptions::from_path(path)
            .with_context(|| format!("failed to load map options from {}", path.display()))?,
        None => MapOptions::default(),
    };
    if let Some(tiles) = tiles {
        options.tiles = tiles;
    }
    if config.is_none() || mode != Mode::Auto {
        options.style = mode.into();
    }
    if options.tiles.trim().is_empty() {
        bail!("no tiles given: pass --tiles or a --config file with `tiles`");
    }
    options.validate().context("invalid map options")?;

    let style = options.style.resolve(&options.tiles, scheme.into());
    let json = if compact {
        style.to_json()?
    } else {
        style.to_json_pretty()?
    };
    println!("{}", json);
    Ok(())
}

fn describe(state: &MapState<HeadlessMap>) -> String {
    match &state.handle {
        Some(handle) => format!("(map #{}, ready: {})", handle.id(), state.ready),
        None => format!("(absent, ready: {})", state.ready),
    }
}

fn run_demo(tiles: &str) -> Result<()> {
    let mut map = MapBuilder::new(tiles)
        .center((-74.006, 40.7128))
        .zoom(11.0)
        .on_load(|handle: &HeadlessMap| log::info!("map #{} loaded", handle.id()))
        .build(HeadlessEngine::new())?;

    let ctx = map.mount()?;
    println!("mounted (cycle {})", map.cycle());

    let early = Marker::new((-74.006, 40.7128))
        .variant(MarkerVariant::Primary)
        .label("City Hall")
        .mount(&ctx)?;
    println!("early marker before load: {}", describe(&early.context().read()?));

    map.handle_event(EngineEvent::Load);
    println!(
        "early marker after load:  {} attached: {}",
        describe(&early.context().read()?),
        early.is_attached()
    );

    let late = Marker::new((-73.9857, 40.7484))
        .label("Empire State")
        .mount(&ctx)?;
    println!(
        "late marker:              {} attached: {}",
        describe(&late.context().read()?),
        late.is_attached()
    );

    let detached: MapContext<HeadlessMap> = MapContext::detached();
    match Marker::new((0.0, 0.0)).mount(&detached) {
        Err(err) => println!("marker outside a map:     {}", err),
        Ok(_) => bail!("a marker mounted without a map container"),
    }

    map.unmount();
    println!("after unmount:            attached: {}", early.is_attached());

    let ctx = map.mount()?;
    let child = Marker::new((-74.0, 40.7)).mount(&ctx)?;
    println!(
        "remounted (cycle {}):     {}",
        map.cycle(),
        describe(&child.context().read()?)
    );

    map.handle_event(EngineEvent::Load);
    println!(
        "after second load:        {} attached: {}",
        describe(&child.context().read()?),
        child.is_attached()
    );
    Ok(())
}
