mod simulation;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::time::Instant;

use marquee_game::{FeatureOpts, seed as share};
use simulation::{Aggregate, PickPolicy, check_determinism, run_one};

#[derive(Debug, Parser)]
#[command(name = "marquee-tester", version)]
#[command(about = "Automated QA sweeps for the Marquee decision-card engine")]
struct Args {
    /// Base seed, or a share code like MQ-STAGE42
    #[arg(long, default_value = "1337")]
    seed: String,

    /// Number of seeded runs (seeds base, base+1, ...)
    #[arg(long, default_value_t = 100)]
    runs: u64,

    /// Choice policy for the driver
    #[arg(long, value_enum, default_value_t = PickPolicy::Random)]
    policy: PickPolicy,

    /// Starting style id (tech, budget, popular)
    #[arg(long)]
    style: Option<String>,

    /// Enable the combo-bonus mechanic
    #[arg(long)]
    combo: bool,

    /// Enable the recovery-bonus mechanic
    #[arg(long)]
    recovery: bool,

    /// Enable balanced random-event selection
    #[arg(long)]
    balanced_events: bool,

    /// Enable the difficulty curve
    #[arg(long)]
    curve: bool,

    /// Report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Per-turn transition logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn features(&self) -> FeatureOpts {
        FeatureOpts {
            combo_bonus: self.combo,
            recovery_bonus: self.recovery,
            balanced_events: self.balanced_events,
            difficulty_curve: self.curve,
        }
    }

    fn base_seed(&self) -> Result<u64> {
        if let Some(seed) = share::decode_to_seed(&self.seed) {
            return Ok(seed);
        }
        self.seed
            .parse::<u64>()
            .with_context(|| format!("'{}' is neither a share code nor a raw seed", self.seed))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("{}", "🎪 Marquee Automated Tester".bright_cyan().bold());
    println!("{}", "===========================".cyan());

    let base = args.base_seed()?;
    let features = args.features();
    let started = Instant::now();

    check_determinism(base, args.policy, features, args.style.as_deref())
        .context("determinism sweep failed")?;
    println!("✅ determinism: seed {base} replays identically");

    let mut aggregate = Aggregate::default();
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for offset in 0..args.runs {
        let seed = base.wrapping_add(offset);
        match run_one(seed, args.policy, features, args.style.as_deref(), args.verbose) {
            Ok(record) => {
                if args.verbose {
                    let verdict = if record.won() {
                        "win".green()
                    } else {
                        "loss".red()
                    };
                    println!(
                        "  seed {seed}: {verdict} after {} cards, {} pts, {} badges, {} events ({})",
                        record.cards_completed,
                        record.total_points,
                        record.badges,
                        record.events_triggered,
                        share::encode_friendly(seed)
                    );
                }
                aggregate.absorb(&record);
                records.push(record);
            }
            Err(err) => failures.push(format!("seed {seed}: {err:#}")),
        }
    }

    if args.report == "json" {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    report(&aggregate, &failures, started);

    if failures.is_empty() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn report(aggregate: &Aggregate, failures: &[String], started: Instant) {
    println!();
    println!("{}", "📊 Sweep Report".bright_white().bold());
    println!(
        "  runs: {}  wins: {}  win rate: {:.1}%",
        aggregate.runs,
        aggregate.wins,
        aggregate.win_rate() * 100.0
    );
    println!(
        "  losses: {} budget, {} other",
        aggregate.losses_by_budget, aggregate.losses_other
    );
    println!(
        "  events fired: {}  points total: {}",
        aggregate.total_events, aggregate.total_points
    );
    println!("  elapsed: {:.2?}", started.elapsed());

    if failures.is_empty() {
        println!("{}", "✅ all invariants held".green().bold());
    } else {
        println!(
            "{}",
            format!("❌ {} run(s) violated invariants", failures.len())
                .red()
                .bold()
        );
        for failure in failures {
            println!("  {}", failure.red());
        }
    }
}
