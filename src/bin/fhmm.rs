use clap::{Parser, Subcommand};
use fhmm::cli::{self, Method};
use fhmm::infer::InferParams;
use fhmm::sample::History;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, about, version)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the two-factor demo model as json
    DemoModel {
        #[clap(long)]
        output: PathBuf,
    },
    /// Sample states and observations from the model
    Generate {
        #[clap(long)]
        model: Option<PathBuf>,
        #[clap(long, default_value = "0")]
        seed: u64,
        #[clap(long)]
        output: PathBuf,
    },
    /// Run VMP or BP on a generated sample
    Infer {
        #[clap(long)]
        model: Option<PathBuf>,
        #[clap(long)]
        sample: PathBuf,
        #[clap(long, value_enum, default_value = "vmp")]
        method: Method,
        #[clap(long, default_value = "4.0")]
        tau: f64,
        #[clap(long, default_value = "16")]
        n_iter: usize,
        #[clap(long)]
        no_trace: bool,
        #[clap(long)]
        output: PathBuf,
    },
    /// Compare VMP and BP over many generated samples
    Evaluate {
        #[clap(long)]
        model: Option<PathBuf>,
        #[clap(long, default_value = "100")]
        n_seeds: u64,
        #[clap(long, default_value = "4.0")]
        tau: f64,
        #[clap(long, default_value = "16")]
        n_iter: usize,
    },
}

fn main() -> fhmm::error::Result<()> {
    env_logger::init();
    let opts: Opts = Opts::parse();
    println!("# started_at={}", chrono::Local::now());
    println!("# n_threads={}", rayon::current_num_threads());
    println!("# opts={:?}", opts);

    match opts.command {
        Command::DemoModel { output } => cli::demo_model(output)?,
        Command::Generate {
            model,
            seed,
            output,
        } => {
            let model = cli::load_model(model.as_deref())?;
            let history = cli::generate(&model, seed, output)?;
            println!("{}", history);
        }
        Command::Infer {
            model,
            sample,
            method,
            tau,
            n_iter,
            no_trace,
            output,
        } => {
            let model = cli::load_model(model.as_deref())?;
            let history = History::from_json_file(sample)?;
            let mut params = InferParams::new(tau, n_iter);
            if no_trace {
                params = params.without_trace();
            }
            let report = cli::infer(&model, history, method, params)?;
            println!(
                "# mean_true_state_posterior={} uniform={}",
                report.mean_true_state_posterior, report.uniform_baseline
            );
            report.to_json_file(output)?;
        }
        Command::Evaluate {
            model,
            n_seeds,
            tau,
            n_iter,
        } => {
            let model = cli::load_model(model.as_deref())?;
            let evaluation = cli::evaluate(&model, n_seeds, InferParams::new(tau, n_iter))?;
            println!("{}", evaluation);
        }
    }

    println!("# finished_at={}", chrono::Local::now());
    Ok(())
}
