use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use zonewatch_core::config;
use zonewatch_core::{Frame, ManualClock, MatcherCache, PathCatalog, TickOutput, ZoneClassifier};
use zonewatch_types::ZoneSettings;

/// Where settings are read from and written back to
#[derive(Debug, Clone)]
pub enum SettingsStore {
    File(PathBuf),
    Default,
}

impl SettingsStore {
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Default, Self::File)
    }

    pub fn load(&self) -> Result<ZoneSettings, String> {
        match self {
            Self::File(path) => config::load_file(path),
            Self::Default => config::load_default(),
        }
        .map_err(|e| e.to_string())
    }

    pub fn save(&self, settings: &ZoneSettings) -> Result<(), String> {
        match self {
            Self::File(path) => config::save_file(path, settings),
            Self::Default => config::store_default(settings),
        }
        .map_err(|e| e.to_string())
    }
}

/// One line of replay output
#[derive(Serialize)]
struct ReplayLine<'a> {
    elapsed_ms: u64,
    #[serde(flatten)]
    output: &'a TickOutput,
}

#[derive(Debug, Default, PartialEq)]
pub struct ReplaySummary {
    pub frames: usize,
    pub skipped: usize,
    pub draws: usize,
    pub alerts: usize,
}

pub fn replay(store: &SettingsStore, frames: &Path, save: bool) -> Result<(), String> {
    let mut settings = store.load()?;
    let catalog = Arc::new(PathCatalog::from_settings(&settings));

    let file = File::open(frames).map_err(|e| format!("{}: {}", frames.display(), e))?;
    let stdout = std::io::stdout();
    let summary = run_replay(
        &settings,
        Arc::clone(&catalog),
        BufReader::new(file),
        &mut stdout.lock(),
    )?;

    tracing::info!(
        frames = summary.frames,
        skipped = summary.skipped,
        draws = summary.draws,
        alerts = summary.alerts,
        unknown = catalog.unknown().len(),
        lethal = catalog.lethal().len(),
        "Replay finished"
    );

    if save {
        catalog.write_into(&mut settings);
        store.save(&settings)?;
    }
    Ok(())
}

/// Feed every frame through a fresh classifier, printing non-empty ticks
///
/// Time is driven by each frame's `elapsed_ms`, so a replay behaves the same
/// however fast it runs.
pub fn run_replay<R: BufRead, W: Write>(
    settings: &ZoneSettings,
    catalog: Arc<PathCatalog>,
    input: R,
    output: &mut W,
) -> Result<ReplaySummary, String> {
    let clock = Arc::new(ManualClock::new());
    let mut classifier = ZoneClassifier::new(settings.clone(), catalog, clock.clone())
        .map_err(|e| format!("failed to start entity cache: {e}"))?;

    let mut summary = ReplaySummary::default();
    for (idx, line) in input.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: Frame =
            serde_json::from_str(&line).map_err(|e| format!("frame on line {}: {}", idx + 1, e))?;

        clock.set_elapsed(Duration::from_millis(frame.elapsed_ms));
        let tick = classifier.tick(&frame);

        summary.frames += 1;
        summary.skipped += usize::from(tick.skipped);
        summary.draws += tick.draws.len();
        summary.alerts += tick.alerts.len();

        if !tick.is_empty() {
            let json = serde_json::to_string(&ReplayLine {
                elapsed_ms: frame.elapsed_ms,
                output: &tick,
            })
            .map_err(|e| e.to_string())?;
            writeln!(output, "{json}").map_err(|e| e.to_string())?;
        }
    }

    classifier.shutdown();
    Ok(summary)
}

pub fn remove_matched(store: &SettingsStore) -> Result<(), String> {
    let mut settings = store.load()?;
    let catalog = PathCatalog::from_settings(&settings);
    let removed = catalog.remove_matched(&settings, &mut MatcherCache::new());
    catalog.write_into(&mut settings);
    store.save(&settings)?;
    println!("Removed {removed} matched unknown effects");
    Ok(())
}

pub fn clear_unknown(store: &SettingsStore) -> Result<(), String> {
    let mut settings = store.load()?;
    let catalog = PathCatalog::from_settings(&settings);
    catalog.clear_all();
    catalog.write_into(&mut settings);
    store.save(&settings)?;
    println!("Cleared unknown and lethal effects");
    Ok(())
}

pub fn show_config(store: &SettingsStore) -> Result<(), String> {
    let settings = store.load()?;
    if let SettingsStore::Default = store
        && let Ok(path) = config::default_path()
    {
        println!("# {}", path.display());
    }
    let text = config::to_toml(&settings).map_err(|e| e.to_string())?;
    print!("{text}");
    Ok(())
}
