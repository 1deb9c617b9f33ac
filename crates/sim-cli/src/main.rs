mod config;
mod wiring;

use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use runtime::{
    logging::{RunLogWriter, TracingRunLogWriter},
    metrics::ValueHistory,
    replay::{ReplayCsvWriter, ReplayRow},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = config::Config::from_env()?;
    info!(
        steps = config.steps,
        agents = config.agents,
        strategy = config.strategy.name(),
        price_rule = config.price_rule.name(),
        seed = config.sim.seed,
        replay_output = %config.replay_output_path,
        "starting simulation"
    );

    let mut simulation = wiring::build_simulation(&config);
    let mut replay_writer = initialize_replay_output(&config.replay_output_path)?;
    let mut run_log = TracingRunLogWriter::new();
    let mut histories = vec![ValueHistory::new(); simulation.agent_count()];

    replay_writer.append_rows(&ReplayRow::from_simulation(&simulation)?)?;
    record_values(&mut histories, &simulation.portfolio_values()?);

    for _ in 0..config.steps {
        for event in simulation.step()? {
            run_log.write(event);
        }
        replay_writer.append_rows(&ReplayRow::from_simulation(&simulation)?)?;
        record_values(&mut histories, &simulation.portfolio_values()?);
    }
    replay_writer.flush()?;

    for (agent, history) in histories.iter().enumerate() {
        if let Some(summary) = history.summary() {
            info!(
                agent,
                start = summary.start,
                end = summary.end,
                min = summary.min,
                max = summary.max,
                total_return = summary.total_return,
                max_drawdown = summary.max_drawdown,
                "agent summary"
            );
        }
    }

    println!("{}", simulation.snapshot()?.to_json_pretty()?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn record_values(histories: &mut [ValueHistory], values: &[f64]) {
    for (history, value) in histories.iter_mut().zip(values) {
        history.record(*value);
    }
}

fn initialize_replay_output(
    path: &str,
) -> Result<ReplayCsvWriter<BufWriter<File>>, std::io::Error> {
    let replay_path = Path::new(path);

    if let Some(parent) = replay_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)?;
    }

    let replay_file = File::create(replay_path)?;
    let mut replay_writer = ReplayCsvWriter::new(BufWriter::new(replay_file));
    replay_writer.write_header()?;
    Ok(replay_writer)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use runtime::{metrics::ValueHistory, replay::REPLAY_CSV_HEADER};

    use super::{initialize_replay_output, record_values};

    #[test]
    fn initialize_replay_output_creates_parent_dir_and_writes_csv_header() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("sim-cli-replay-{unique}"));
        let replay_path = root.join("nested").join("replay.csv");

        let mut writer = initialize_replay_output(replay_path.to_str().unwrap())
            .expect("startup should initialize replay output");
        writer.flush().expect("replay header should flush");

        let actual = fs::read_to_string(&replay_path).expect("replay output file should exist");
        assert_eq!(actual, REPLAY_CSV_HEADER);

        fs::remove_dir_all(&root).expect("temp replay directory should be removable");
    }

    #[test]
    fn record_values_appends_per_agent() {
        let mut histories = vec![ValueHistory::new(); 2];

        record_values(&mut histories, &[1.0, 2.0]);
        record_values(&mut histories, &[3.0, 4.0]);

        assert_eq!(histories[0].values(), &[1.0, 3.0]);
        assert_eq!(histories[1].values(), &[2.0, 4.0]);
    }
}
