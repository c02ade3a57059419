use anyhow::{bail, Context, Result};
use clap::Parser;
use erpkit::{component_report, io::SignalWriter, AnalysisConfig, RawDataset, Selection, Target};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "erp_report", about = "ERP component statistics for a subject or group")]
struct Args {
    /// Dataset safetensors (values / timeline / subjects / groups)
    #[arg(long)]
    input: PathBuf,

    /// Subject id
    #[arg(long, conflicts_with = "group")]
    subject: Option<String>,

    /// Group label
    #[arg(long)]
    group: Option<String>,

    /// First trial (1-based)
    #[arg(long, default_value_t = 1)]
    trial: usize,

    /// Last trial, inclusive (omit for a single trial)
    #[arg(long)]
    trial_end: Option<usize>,

    /// First block (1-based)
    #[arg(long, default_value_t = 1)]
    block: usize,

    /// Last block, inclusive (omit for a single block)
    #[arg(long)]
    block_end: Option<usize>,

    /// Components to measure (comma-separated)
    #[arg(long, default_value = "N100,P200")]
    components: String,

    /// Stimulus onsets in ms (comma-separated)
    #[arg(long, default_value = "0")]
    stimulus: String,

    /// Component window half-width in ms
    #[arg(long, default_value_t = 50.0)]
    half_width: f64,

    /// Baseline subtracted before every statistic
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    baseline: f64,

    /// Optional safetensors output for the built signal
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let target = match (args.subject, args.group) {
        (Some(s), None) => Target::Subject(s),
        (None, Some(g)) => Target::Group(g),
        _ => bail!("pass exactly one of --subject or --group"),
    };

    let ds = RawDataset::load(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    println!(
        "Loaded {} subjects × {} samples × {} trials × {} blocks, groups {:?}",
        ds.n_subjects(),
        ds.n_times(),
        ds.n_trials(),
        ds.n_blocks(),
        ds.group_labels()
    );

    let stimulus_times = args
        .stimulus
        .split(',')
        .map(|s| s.trim().parse::<f64>().with_context(|| format!("bad stimulus time '{s}'")))
        .collect::<Result<Vec<_>>>()?;

    let cfg = AnalysisConfig {
        stimulus_times,
        component_half_width: args.half_width,
        baseline: args.baseline,
        components: args
            .components
            .split(',')
            .map(|s| s.trim().to_string())
            .collect(),
    };

    let trials = Selection::from_bounds(args.trial, args.trial_end);
    let blocks = Selection::from_bounds(args.block, args.block_end);

    let report = component_report(&ds, &target, trials, blocks, &cfg)
        .with_context(|| format!("{target:?} trials={trials} blocks={blocks}"))?;

    let label = report.signal.label().unwrap_or("signal").to_string();
    println!("{label}");
    for row in &report.rows {
        let s = &row.stats;
        println!(
            "  {:>6} @ {:>6} ms [{:.1}, {:.1}]  sum={:.4} abs_sum={:.4} rms={:.4} \
             true_rms={:.4} peak={:.4} auc={:.4} abs_auc={:.4}",
            row.component.to_string(),
            row.stimulus_time,
            row.window.0,
            row.window.1,
            s.sum,
            s.absolute_sum,
            s.rms,
            s.true_rms,
            s.peak,
            s.area,
            s.absolute_area,
        );
    }

    if let Some(out) = &args.output {
        let mut w = SignalWriter::new();
        w.add_signal("signal", &report.signal);
        w.write(out).with_context(|| format!("writing {}", out.display()))?;
        println!("Written → {}", out.display());
    }

    Ok(())
}
