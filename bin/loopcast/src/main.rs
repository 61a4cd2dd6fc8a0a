use std::path::PathBuf;

use clap::Parser;
use loopcast::{
    AnchorStore, CachedDurationProvider, Catalog, DurationProvider, FfprobeDurationProvider,
    FileAnchorStore, MemoryAnchorStore, PlaylistRequest, PlaylistType, Scheduler,
    StaticDurationProvider, Track,
};

mod config;

use config::Config;

#[derive(Parser, Debug, Clone)]
pub struct LoopcastArgs {
    /// Channel configuration file
    #[clap(short, long, env = "LOOPCAST_CONFIG", default_value = "loopcast.toml")]
    config: PathBuf,

    /// Request in positional form
    ///
    /// Keys and values alternate. eg. "/type/live/disc/yes/time/1700000000/window/100".
    /// Overrides all other request arguments.
    #[clap(long)]
    path: Option<String>,

    /// Playlist type: vod, playlist or live
    #[clap(long = "type", default_value = "live")]
    playlist_type: PlaylistType,

    /// Use a continuous time base instead of explicit clip and segment indices
    #[clap(long)]
    no_discontinuity: bool,

    /// Query time in milliseconds since UNIX epoch. Defaults to now.
    #[clap(long)]
    time: Option<i64>,

    /// Attach synthetic key-frame durations to every sequence (test fixture)
    #[clap(long)]
    key_frames: bool,

    /// Debug output
    #[clap(long, alias = "debug")]
    verbose: bool,
}

impl LoopcastArgs {
    fn request(&self, config: &Config) -> anyhow::Result<PlaylistRequest> {
        if let Some(path) = &self.path {
            return Ok(PlaylistRequest::from_path(path, &config.schedule)?);
        }

        let mut request = PlaylistRequest::new(self.playlist_type, &config.schedule)
            .with_discontinuity(!self.no_discontinuity);
        request.query_time_millis = self.time;
        request.key_frames = self.key_frames;
        request.validate()?;
        Ok(request)
    }
}

async fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    let paths = config.paths();
    if let Some(durations) = config.known_durations() {
        let provider: StaticDurationProvider = durations.into_iter().collect();
        return resolve(&paths, &provider).await;
    }

    let ffprobe = match &config.ffprobe {
        Some(ffprobe) => FfprobeDurationProvider::with_executable(ffprobe),
        None => FfprobeDurationProvider::new()?,
    };
    let provider = CachedDurationProvider::new(ffprobe);
    for clip in &config.clips {
        if let Some(duration) = clip.duration {
            provider.prime(&clip.path, duration);
        }
    }
    resolve(&paths, &provider).await
}

async fn resolve(paths: &[&str], provider: &impl DurationProvider) -> anyhow::Result<Catalog> {
    let catalog = Catalog::resolve(paths, provider).await?;
    log::info!(
        "Resolved {} clips, cycle duration {}ms",
        catalog.len(),
        catalog.cycle_duration_millis()
    );
    Ok(catalog)
}

fn schedule<S: AnchorStore>(
    anchors: S,
    config: &Config,
    catalog: &Catalog,
    request: &PlaylistRequest,
) -> anyhow::Result<String> {
    let mut tracks = vec![Track::primary(catalog, config.language.clone())];
    tracks.extend(config.tracks.iter().cloned());

    let media_set = Scheduler::new(anchors).schedule(&config.name, catalog, &tracks, request)?;
    Ok(media_set.to_json()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = LoopcastArgs::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(&args.config)?;
    let request = args.request(&config)?;
    let catalog = load_catalog(&config).await?;

    let output = match &config.anchor_file {
        Some(file) => schedule(FileAnchorStore::new(file), &config, &catalog, &request)?,
        None => {
            log::warn!("No anchor_file configured, the reference time will not persist.");
            schedule(MemoryAnchorStore::new(), &config, &catalog, &request)?
        }
    };
    println!("{output}");

    Ok(())
}
