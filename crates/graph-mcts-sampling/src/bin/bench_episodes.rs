//! Benchmark episode throughput on the synthetic problems.
//!
//!   cargo run --release -p graph-mcts-sampling --bin bench_episodes \
//!     [num_episodes] [depth] [seed]
//!
//! Set RUST_LOG=debug to see every committed move.

use graph_mcts::{ActionSelection, Mcts, Problem, ProblemError, SearchConfig};
use graph_mcts_sampling::{
    run_episodes, BitstringProblem, CountingProblem, EpisodeConfig, EpisodeStats,
};
use log::{error, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn print_header(label: &str) {
    println!("\n{}", label);
    println!("{:-<90}", "");
    println!(
        "{:>8} {:>9} {:>9} {:>11} {:>11} {:>8} {:>9} {:>9} {:>8}",
        "samples", "select", "episodes", "samples/s", "episodes/s", "avg_len", "vertices", "mean_r",
        "best_r"
    );
    println!("{:-<90}", "");
}

fn print_row(config: &EpisodeConfig, s: &EpisodeStats) {
    let selection = match config.action_selection {
        ActionSelection::Visit => "visit",
        ActionSelection::Softmax => "softmax",
    };
    println!(
        "{:>8} {:>9} {:>9} {:>11.0} {:>11.1} {:>8.1} {:>9} {:>9.3} {:>8.3}",
        config.num_mcts_samples,
        selection,
        s.episodes,
        s.samples_per_second(),
        s.episodes_per_second(),
        s.avg_length(),
        s.distinct_states,
        s.mean_reward,
        s.best_reward,
    );
}

fn run_bench<P: Problem + Clone>(
    label: &str,
    problem: &P,
    num_episodes: u32,
    sample_counts: &[u32],
    seed: u64,
) -> Result<(), ProblemError> {
    print_header(label);

    for &selection in &[ActionSelection::Visit, ActionSelection::Softmax] {
        for &num_mcts_samples in sample_counts {
            // Fresh engine per row so rows don't share statistics.
            let mut engine = Mcts::new(problem.clone(), SearchConfig::default());
            let mut rng = SmallRng::seed_from_u64(seed);
            let config = EpisodeConfig {
                num_episodes,
                num_mcts_samples,
                action_selection: selection,
            };
            let result = run_episodes(&mut engine, &config, &mut rng)?;
            print_row(&config, &result.stats);
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let num_episodes: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(20);
    let depth: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(16);
    let seed: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(42);

    let sample_counts = [1, 10, 50, 200];

    info!("bench_episodes: {num_episodes} episodes, depth {depth}, seed {seed}");

    let counting = CountingProblem::new(depth, depth * 3 / 4);
    let label = format!(
        "counting depth={depth} target={} ({} states)",
        depth * 3 / 4,
        counting.num_states()
    );
    if let Err(e) = run_bench(&label, &counting, num_episodes, &sample_counts, seed) {
        error!("counting benchmark failed: {e}");
        std::process::exit(1);
    }

    // Alternating target bits, truncated to `depth` (max 64).
    let len = depth.min(64) as usize;
    let bitstring = BitstringProblem::from_pattern(0xAAAA_AAAA_AAAA_AAAA, len);
    let label = format!("bitstring len={len}");
    if let Err(e) = run_bench(&label, &bitstring, num_episodes, &sample_counts, seed) {
        error!("bitstring benchmark failed: {e}");
        std::process::exit(1);
    }
}
