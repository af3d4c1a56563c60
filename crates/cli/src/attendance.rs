//! `rollcall run | validate | match` — attendance reconciliation commands.

use std::path::{Path, PathBuf};

use rollcall_recon::io::{load_roster_csv, load_session_csv, write_roster_csv};
use rollcall_recon::matcher::accepts;
use rollcall_recon::model::{Roster, SessionAttendance};
use rollcall_recon::observer::{RecordOutcome, ReconcileObserver, TracingObserver};
use rollcall_recon::report::render_unmatched_report;
use rollcall_recon::{Accumulation, RollcallConfig, Scorer, ScorerKind};

use crate::exit_codes::EXIT_UNMATCHED;
use crate::CliError;

pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub session: Option<PathBuf>,
    pub roster: Option<PathBuf>,
    pub out_roster: Option<PathBuf>,
    pub unmatched: Option<PathBuf>,
    pub match_threshold: Option<u8>,
    pub duration_threshold: Option<f64>,
    pub accumulation: Option<Accumulation>,
    pub scorer: Option<ScorerKind>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub progress: bool,
    pub fail_on_unmatched: bool,
}

/// Loaded config plus the directory its relative paths resolve against.
struct LoadedConfig {
    config: RollcallConfig,
    base_dir: PathBuf,
}

impl LoadedConfig {
    fn resolve(&self, file: &str) -> PathBuf {
        self.base_dir.join(file)
    }
}

fn load_config(path: Option<&Path>) -> Result<LoadedConfig, CliError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::runtime(format!("cannot read config {}: {e}", path.display()))
            })?;
            let config = RollcallConfig::from_toml(&text)?;
            tracing::debug!(config = %path.display(), "loaded config");
            let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            Ok(LoadedConfig { config, base_dir })
        }
        None => Ok(LoadedConfig { config: RollcallConfig::default(), base_dir: PathBuf::from(".") }),
    }
}

fn read_input(path: &Path, what: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::runtime(format!("cannot read {what} {}: {e}", path.display())))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write every output to `<path>.tmp`, then rename them all into place.
/// A failed write removes the staged files, so no output is left behind.
fn write_outputs(outputs: &[(PathBuf, &str)]) -> Result<(), CliError> {
    let mut staged: Vec<PathBuf> = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        let tmp = tmp_path(path);
        if let Err(e) = std::fs::write(&tmp, contents) {
            for t in &staged {
                let _ = std::fs::remove_file(t);
            }
            return Err(CliError::runtime(format!("cannot write {}: {e}", path.display())));
        }
        staged.push(tmp);
    }
    for ((path, _), tmp) in outputs.iter().zip(&staged) {
        std::fs::rename(tmp, path)
            .map_err(|e| CliError::runtime(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn load_roster(loaded: &LoadedConfig, override_path: Option<PathBuf>) -> Result<Roster, CliError> {
    let path = override_path.unwrap_or_else(|| loaded.resolve(&loaded.config.roster.file));
    let text = read_input(&path, "roster")?;
    tracing::debug!(roster = %path.display(), "loading roster");
    Ok(load_roster_csv(&text, &loaded.config.roster)?)
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// One stderr line per attendee, plus the tracing events.
struct ProgressObserver;

impl ReconcileObserver for ProgressObserver {
    fn on_record(&mut self, record: &SessionAttendance, outcome: &RecordOutcome<'_>) {
        TracingObserver.on_record(record, outcome);
        match outcome {
            RecordOutcome::Matched { roster_name, .. } => {
                eprintln!("  ok     {} > {}", record.display_name, roster_name)
            }
            RecordOutcome::BelowDuration { roster_name, duration_minutes, .. } => eprintln!(
                "  short  {} > {} (duration: {})",
                record.display_name, roster_name, duration_minutes
            ),
            RecordOutcome::Unmatched { .. } => eprintln!("  ??     {}", record.display_name),
        }
    }
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut loaded = load_config(args.config.as_deref())?;

    {
        let t = &mut loaded.config.thresholds;
        if let Some(m) = args.match_threshold {
            t.match_threshold = m;
        }
        if let Some(d) = args.duration_threshold {
            t.duration_threshold = d;
        }
        if let Some(a) = args.accumulation {
            t.accumulation = a;
        }
        if let Some(s) = args.scorer {
            t.scorer = s;
        }
    }
    loaded
        .config
        .validate()
        .map_err(|e| CliError::usage(e.to_string()))?;

    let config = &loaded.config;
    let policy = config.policy();

    let session_path = args.session.unwrap_or_else(|| loaded.resolve(&config.session.file));
    tracing::debug!(session = %session_path.display(), "loading session export");
    let records = load_session_csv(&read_input(&session_path, "session")?, &config.session)?;
    let mut roster = load_roster(&loaded, args.roster)?;

    if args.progress {
        eprintln!(
            "matching {} attendees to roster (fuzzy threshold {}):",
            records.len(),
            policy.match_threshold
        );
    }
    let result = if args.progress {
        rollcall_recon::run(&mut roster, &records, &policy, &mut ProgressObserver)
    } else {
        rollcall_recon::run(&mut roster, &records, &policy, &mut TracingObserver)
    };

    let roster_csv = write_roster_csv(&roster, &config.roster)?;
    let report = render_unmatched_report(&result.unmatched, policy.match_threshold);
    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

    let roster_out = args.out_roster.unwrap_or_else(|| loaded.resolve(&config.output.roster));
    let unmatched_out = args.unmatched.unwrap_or_else(|| loaded.resolve(&config.output.unmatched));
    let json_out = args
        .output
        .or_else(|| config.output.json.as_deref().map(|p| loaded.resolve(p)));

    let mut outputs = vec![(unmatched_out.clone(), report.as_str()), (roster_out, roster_csv.as_str())];
    if let Some(path) = json_out {
        outputs.push((path, json_str.as_str()));
    }
    write_outputs(&outputs)?;

    if args.json {
        println!("{json_str}");
    }

    let s = &result.summary;
    eprintln!(
        "{} roster entries: {} successful, {} unsuccessful, {} no show; {} of {} attendees unmatched",
        s.roster_entries,
        s.successful,
        s.unsuccessful,
        s.no_show,
        s.unmatched_records,
        s.session_records,
    );

    if args.fail_on_unmatched && s.unmatched_records > 0 {
        return Err(CliError {
            code: EXIT_UNMATCHED,
            message: format!("{} unmatched attendee(s)", s.unmatched_records),
            hint: Some(format!("see {}", unmatched_out.display())),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let loaded = load_config(Some(&config_path))?;
    let t = &loaded.config.thresholds;
    eprintln!(
        "{}: ok (match >= {}, duration >= {} min, accumulation {}, scorer {})",
        config_path.display(),
        t.match_threshold,
        t.duration_threshold,
        t.accumulation,
        t.scorer,
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// match
// ---------------------------------------------------------------------------

pub fn cmd_match(
    name: String,
    config_path: Option<PathBuf>,
    roster_path: Option<PathBuf>,
    match_threshold: Option<u8>,
    scorer: Option<ScorerKind>,
    limit: usize,
) -> Result<(), CliError> {
    if limit == 0 {
        return Err(CliError::usage("--limit must be at least 1"));
    }

    let loaded = load_config(config_path.as_deref())?;
    let roster = load_roster(&loaded, roster_path)?;
    let mut policy = loaded.config.policy();
    if let Some(kind) = scorer {
        policy = policy.with_scorer(kind);
    }
    let threshold = match_threshold.unwrap_or(policy.match_threshold);
    let scorer = policy.scorer.scorer();

    if roster.entries.is_empty() {
        return Err(CliError::runtime("roster has no entries").with_hint("nothing to match against"));
    }

    let mut scored: Vec<(usize, f64)> = roster
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| (i, scorer.score(&name, &e.canonical_name)))
        .collect();
    // Highest score first; ties keep roster order, same as the matcher.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    for (rank, (i, score)) in scored.iter().take(limit).enumerate() {
        let marker = if rank == 0 && accepts(*score, threshold) { "*" } else { " " };
        println!("{marker} {score:6.2}  {}", roster.entries[*i].canonical_name);
    }

    let (best, best_score) = scored[0];
    if accepts(best_score, threshold) {
        eprintln!("match: {} (threshold {threshold})", roster.entries[best].canonical_name);
    } else {
        eprintln!("no match at threshold {threshold}");
    }
    Ok(())
}
