//! Train command - self-play training of the first and second agents

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    agent::Agent,
    app::TrainingConfig,
    cli::output::{format_number, print_kv, print_section},
    pipeline::{LoggingObserver, ProgressObserver, Trainer, TrainingReport},
    session::{FIRST_POLICY_FILE, SECOND_POLICY_FILE},
    tictactoe::Player,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingReport,
    config: &'a TrainingConfig,
    first_policy: &'a Path,
    second_policy: &'a Path,
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "1" => Ok(Player::X),
        "o" | "second" | "-1" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name means a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(about = "Train both agents by self-play", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// JSON training configuration; the flags below override its fields
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of self-play episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Step size of the TD backup
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Exploration rate of both agents during training
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip backups across exploratory moves
    #[arg(long)]
    pub skip_exploratory_backups: bool,

    /// Episodes between progress log lines (0 disables them)
    #[arg(long)]
    pub log_interval: Option<usize>,

    /// Output file for the first mover's policy (`.json` for JSON)
    #[arg(long, default_value = FIRST_POLICY_FILE)]
    pub first_output: PathBuf,

    /// Output file for the second mover's policy (`.json` for JSON)
    #[arg(long, default_value = SECOND_POLICY_FILE)]
    pub second_output: PathBuf,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

impl TrainArgs {
    fn training_config(&self) -> Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => TrainingConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.skip_exploratory_backups {
            config.skip_exploratory_backups = true;
        }
        if let Some(log_interval) = self.log_interval {
            config.log_interval = log_interval;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.training_config()?;
    let (first_config, second_config) = config.agent_configs();
    let mut first = Agent::from_config(&first_config)?;
    let mut second = Agent::from_config(&second_config)?;

    let mut trainer = Trainer::new(config.clone())?
        .with_observer(Box::new(LoggingObserver::new(config.log_interval)));
    if args.progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }

    let report = trainer
        .train(&mut first, &mut second)
        .context("Self-play training failed")?;

    for (agent, path) in [(&first, &args.first_output), (&second, &args.second_output)] {
        ensure_parent(path)?;
        agent
            .save_policy(path)
            .with_context(|| format!("Failed to save policy to {}", path.display()))?;
    }

    print_section("Training Complete");
    print_kv("Episodes", &format_number(report.episodes));
    print_kv(
        "First wins",
        &format!(
            "{} ({:.1}%)",
            report.outcomes.first_wins,
            report.first_win_rate * 100.0
        ),
    );
    print_kv(
        "Second wins",
        &format!(
            "{} ({:.1}%)",
            report.outcomes.second_wins,
            report.second_win_rate * 100.0
        ),
    );
    print_kv(
        "Draws",
        &format!("{} ({:.1}%)", report.outcomes.draws, report.draw_rate * 100.0),
    );
    print_kv("First policy", &args.first_output.display().to_string());
    print_kv("Second policy", &args.second_output.display().to_string());

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        ensure_parent(&path)?;
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary {}", path.display()))?;
        to_writer_pretty(
            file,
            &TrainingSummaryFile {
                training: &report,
                config: &config,
                first_policy: &args.first_output,
                second_policy: &args.second_output,
            },
        )?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}
