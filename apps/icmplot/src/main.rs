mod preflight;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, SecondsFormat, Utc};
use clap::{Args, Parser, Subcommand};
use icmplot_model::Target;
use icmplot_probe::{run_cycles, CycleSettings};
use icmplot_render::render_chart;
use icmplot_series::{load_records, prepare_plot_data};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "icmplot", version, about = "Cyclic ICMP reachability probing and charting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Probe(ProbeArgs),
    Plot(PlotArgs),
    Run(RunArgs),
}

#[derive(Args)]
#[command(about = "Ping targets over repeated cycles and save the records. \
Only probe hosts you own or have permission to test.")]
struct ProbeArgs {
    /// Targets file, one `ip[=alias]` per line, `#` comments.
    #[arg(long)]
    targets: Option<PathBuf>,

    /// Inline target as `ip[=alias]`; repeatable.
    #[arg(long = "target")]
    target_list: Vec<String>,

    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 1)]
    cycles: u32,

    #[arg(long, default_value_t = 5.0)]
    timeout_secs: f64,

    #[arg(long, default_value_t = 0)]
    interval_ms: u64,
}

#[derive(Args)]
#[command(about = "Render a saved record batch into one bar-chart image")]
struct PlotArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Appended to the timestamped image file name.
    #[arg(long, default_value = "pings")]
    suffix: String,
}

#[derive(Args)]
#[command(about = "Probe then plot into one output directory")]
struct RunArgs {
    #[arg(long)]
    targets: Option<PathBuf>,

    #[arg(long = "target")]
    target_list: Vec<String>,

    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 1)]
    cycles: u32,

    #[arg(long, default_value_t = 5.0)]
    timeout_secs: f64,

    #[arg(long, default_value_t = 0)]
    interval_ms: u64,

    #[arg(long, default_value = "pings")]
    suffix: String,

    #[arg(long)]
    force: bool,

    #[arg(long)]
    open: bool,
}

#[derive(Serialize)]
struct RunArgsSummary {
    targets_file: Option<PathBuf>,
    targets: Vec<String>,
    out_dir: PathBuf,
    cycles: u32,
    timeout_secs: f64,
    interval_ms: u64,
    suffix: String,
    force: bool,
    open: bool,
}

#[derive(Serialize)]
struct RunOutputs {
    records: PathBuf,
    image: PathBuf,
    run: PathBuf,
}

#[derive(Serialize)]
struct HostInfo {
    os: String,
    arch: String,
}

#[derive(Serialize)]
struct RunReceipt {
    version: String,
    started_at_utc: String,
    finished_at_utc: String,
    args: RunArgsSummary,
    outputs: RunOutputs,
    host: HostInfo,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // One handler for the whole process: the first ^C asks the probe loop
    // to stop after the current cycle, and keeps the process alive through
    // aggregation and the image save.
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || {
        eprintln!("interrupt: finishing current cycle, then saving");
        flag.store(true, Ordering::SeqCst);
    })
    .context("failed to install interrupt handler")?;

    match cli.command {
        Commands::Probe(args) => run_probe(args, &stop),
        Commands::Plot(args) => run_plot(args),
        Commands::Run(args) => run_run(args, &stop),
    }
}

fn run_probe(args: ProbeArgs, stop: &AtomicBool) -> Result<()> {
    let targets = collect_targets(args.targets.as_deref(), &args.target_list)?;
    let settings = cycle_settings(args.cycles, args.timeout_secs, args.interval_ms)?;

    let sender = preflight::verify_icmp()?;
    let records = run_cycles(&targets, &settings, &sender, stop);

    write_json(&args.out, &records)?;
    eprintln!("probe: wrote {} records to {:?}", records.len(), args.out);
    Ok(())
}

fn run_plot(args: PlotArgs) -> Result<()> {
    preflight::verify_rendering()?;

    let records = load_records(&args.in_path)?;
    let plot = prepare_plot_data(&records)?;
    let path = render_chart(&plot, &args.out_dir, &args.suffix)?;

    eprintln!("plot: wrote {path:?}");
    Ok(())
}

fn run_run(args: RunArgs, stop: &AtomicBool) -> Result<()> {
    let started_at_utc = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let targets = collect_targets(args.targets.as_deref(), &args.target_list)?;
    let settings = cycle_settings(args.cycles, args.timeout_secs, args.interval_ms)?;

    // Verify everything up front so a missing font is reported before any
    // packet goes out.
    preflight::verify_rendering()?;
    let sender = preflight::verify_icmp()?;

    let out_dir = args.out_dir.clone().unwrap_or_else(default_out_dir);
    if out_dir.exists() {
        if !out_dir.is_dir() {
            return Err(anyhow!(
                "output path {:?} exists and is not a directory",
                out_dir
            ));
        }
        if !args.force {
            return Err(anyhow!(
                "output directory {:?} already exists (use --force)",
                out_dir
            ));
        }
    } else {
        fs::create_dir_all(&out_dir)
            .map_err(|err| anyhow!("failed to create output directory {:?}: {}", out_dir, err))?;
    }

    let records_path = out_dir.join("records.json");
    let run_path = out_dir.join("run.json");

    let records = run_cycles(&targets, &settings, &sender, stop);
    write_json(&records_path, &records)?;
    eprintln!(
        "probe: wrote {} records to {:?}",
        records.len(),
        records_path
    );

    let plot = prepare_plot_data(&records)?;
    let image_path = render_chart(&plot, &out_dir, &args.suffix)?;
    eprintln!("plot: wrote {image_path:?}");

    let finished_at_utc = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let receipt = RunReceipt {
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at_utc,
        finished_at_utc,
        args: RunArgsSummary {
            targets_file: args.targets,
            targets: args.target_list,
            out_dir: out_dir.clone(),
            cycles: args.cycles,
            timeout_secs: args.timeout_secs,
            interval_ms: args.interval_ms,
            suffix: args.suffix,
            force: args.force,
            open: args.open,
        },
        outputs: RunOutputs {
            records: records_path,
            image: image_path.clone(),
            run: run_path.clone(),
        },
        host: HostInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        },
    };
    write_json(&run_path, &receipt)?;

    if args.open && image_path.exists() {
        open_file(&image_path)?;
    }

    Ok(())
}

fn cycle_settings(cycles: u32, timeout_secs: f64, interval_ms: u64) -> Result<CycleSettings> {
    if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
        return Err(anyhow!("--timeout-secs must be positive"));
    }

    Ok(CycleSettings {
        cycles,
        timeout: Duration::from_secs_f64(timeout_secs),
        interval: Duration::from_millis(interval_ms),
    })
}

fn collect_targets(file: Option<&Path>, inline: &[String]) -> Result<Vec<Target>> {
    let mut targets: Vec<Target> = Vec::new();

    if let Some(path) = file {
        let contents = fs::read_to_string(path)
            .map_err(|err| anyhow!("failed to read targets file {:?}: {}", path, err))?;
        for line in contents.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            targets.push(parse_target(trimmed));
        }
    }

    targets.extend(inline.iter().map(|spec| parse_target(spec)));

    if targets.is_empty() {
        return Err(anyhow!("no targets provided (use --targets or --target)"));
    }

    Ok(targets)
}

fn parse_target(spec: &str) -> Target {
    match spec.split_once('=') {
        Some((ip, alias)) if !alias.trim().is_empty() => Target::new(ip.trim(), alias.trim()),
        _ => {
            let ip = spec.trim_end_matches('=').trim();
            Target::new(ip, ip)
        }
    }
}

fn default_out_dir() -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    PathBuf::from("output").join(stamp)
}

fn open_file(path: &Path) -> Result<()> {
    let mut cmd = if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "linux") {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    } else {
        return Err(anyhow!("--open is not supported on this OS"));
    };

    let status = cmd
        .status()
        .map_err(|err| anyhow!("failed to launch opener: {err}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("open command failed with status: {status}"))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    atomic_write(path, &json)
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .map_err(|err| anyhow!("failed to create output directory {:?}: {}", parent, err))?;
    }

    let tmp_path = temp_path(path);
    let mut file = fs::File::create(&tmp_path)
        .map_err(|err| anyhow!("failed to create temp file {:?}: {}", tmp_path, err))?;
    file.write_all(data)
        .map_err(|err| anyhow!("failed to write temp file {:?}: {}", tmp_path, err))?;
    file.sync_all()
        .map_err(|err| anyhow!("failed to sync temp file {:?}: {}", tmp_path, err))?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(anyhow!("failed to replace output {:?}: {}", path, err));
    }

    if let Ok(dir) = fs::File::open(parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    let tmp_name = format!(".{}.part-{}-{}", file_name, pid, stamp);
    parent.join(tmp_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_with_alias() {
        let target = parse_target("192.0.2.1=gateway");
        assert_eq!(target.ip, "192.0.2.1");
        assert_eq!(target.alias, "gateway");
    }

    #[test]
    fn parse_target_without_alias_uses_ip() {
        let target = parse_target("192.0.2.1");
        assert_eq!(target.ip, "192.0.2.1");
        assert_eq!(target.alias, "192.0.2.1");
    }

    #[test]
    fn parse_target_with_empty_alias_uses_ip() {
        let target = parse_target("192.0.2.1=");
        assert_eq!(target.ip, "192.0.2.1");
        assert_eq!(target.alias, "192.0.2.1");
    }

    #[test]
    fn cycle_settings_rejects_zero_timeout() {
        assert!(cycle_settings(1, 0.0, 0).is_err());
        assert!(cycle_settings(1, -1.0, 0).is_err());
        assert!(cycle_settings(1, 2.5, 0).is_ok());
    }
}
