use std::path::PathBuf;

use clap::{Parser, Subcommand};
use subsync_core::{
    AppConfig, AudioManifest, LintRules, SrtOptions, Synchronizer, TimelineStage, build_manifest,
    diagnostics::init_tracing_with_config,
    lint::{lint_script_file, render_report},
    load_scene_map,
    manifest::summarize,
    sync::rehearse,
    time::format_clock,
    write_srt, write_timeline_json,
};

#[derive(Debug, Parser)]
#[command(name = "subsync-cli")]
#[command(about = "Audio manifest, narration dry-run and script pacing tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file; defaults to subsync.config.toml in the current or parent directory.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Summarise the clips listed in an audio manifest.
    Inspect {
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Build an audio manifest from a scene map and rendered clips.
    BuildManifest {
        #[arg(long)]
        scene_map: PathBuf,

        #[arg(long)]
        audio_dir: PathBuf,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run every scripted line through the synchronizer without rendering.
    DryRun {
        #[arg(long)]
        scene_map: PathBuf,

        #[arg(long)]
        manifest: Option<PathBuf>,

        #[arg(long)]
        srt: Option<PathBuf>,

        #[arg(long)]
        json: Option<PathBuf>,

        #[arg(long)]
        speaker_names: bool,
    },
    /// Check dialogue pacing in a markdown script.
    Lint {
        #[arg(long)]
        script: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Inspect { .. } => "inspect",
            Self::BuildManifest { .. } => "build-manifest",
            Self::DryRun { .. } => "dry-run",
            Self::Lint { .. } => "lint",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let _telemetry =
        init_tracing_with_config(&cli.log_dir, &config.diagnostics, cli.command.name())?;

    match cli.command {
        Commands::Inspect { manifest } => {
            let path = manifest.unwrap_or_else(|| config.manifest.path.clone());
            let manifest = AudioManifest::load(&path)?;
            println!("{}: {} groups, {} clips", path.display(), manifest.len(), manifest.clip_count());
            for group in summarize(&manifest) {
                println!(
                    "  {:<12} {:>3} clips  {:>6}  invalid: {}",
                    group.group,
                    group.clip_count,
                    format_clock(group.total_duration),
                    group.invalid_records
                );
            }
        }
        Commands::BuildManifest {
            scene_map,
            audio_dir,
            output,
        } => {
            let scene_map = load_scene_map(&scene_map)?;
            let manifest = build_manifest(&scene_map, &audio_dir)?;
            let output = output.unwrap_or_else(|| config.manifest.path.clone());
            manifest.save(&output)?;
            tracing::info!(path = %output.display(), clips = manifest.clip_count(), "audio manifest written");
        }
        Commands::DryRun {
            scene_map,
            manifest,
            srt,
            json,
            speaker_names,
        } => {
            let scene_map = load_scene_map(&scene_map)?;
            let manifest_path = manifest.unwrap_or_else(|| config.manifest.path.clone());
            let manifest = AudioManifest::load_or_default(&manifest_path);
            let settings = config.sync_settings();
            let synchronizer = Synchronizer::new(&manifest, &settings);

            let mut stage = TimelineStage::new();
            let reports = rehearse(&synchronizer, &scene_map, &mut stage);
            let timeline = stage.finish();

            for report in &reports {
                println!(
                    "{:<20} group {:<10} lines {:>3}  matched {:>3}  audio {:>3}  cursor {}/{}",
                    report.scene,
                    report.group,
                    report.lines,
                    report.matched,
                    report.with_audio,
                    report.cursor,
                    report.clips
                );
            }
            println!("total: {}", format_clock(timeline.duration));

            if let Some(path) = srt {
                let options = SrtOptions {
                    include_speaker: speaker_names,
                };
                write_srt(&path, &timeline, options)?;
            }
            if let Some(path) = json {
                write_timeline_json(&path, &timeline)?;
            }
        }
        Commands::Lint { script, json } => {
            let rules: LintRules = config.lint.clone();
            let report = lint_script_file(&script, &rules)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report, &rules));
            }
        }
    }

    Ok(())
}
