// scripts/benchmark.rs
use fast_pnl::analytics::{greeks_decay, greeks_series, GreeksSeriesConfig};
use fast_pnl::demo::DemoPayloadGenerator;
use fast_pnl::math_utils::Timer;
use fast_pnl::metrics::{PnlSurface, ScenarioSummary, SurfaceOptions};
use fast_pnl::scenario::{ScenarioConfig, ScenarioGenerator, ScenarioRequest, DEFAULT_DAYS_AXIS};
use fast_pnl::PnlResult;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::cpu_model(),
            cpu_cores: num_cpus::get(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn cpu_model() -> String {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|line| line.starts_with("model name"))
                    .and_then(|line| line.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
            .unwrap_or_else(|| "Unknown CPU".to_string())
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    items: usize,
    time_ms: f64,
    throughput_per_sec: f64,
}

impl BenchmarkResult {
    fn new(name: impl Into<String>, items: usize, time_ms: f64) -> Self {
        BenchmarkResult {
            name: name.into(),
            items,
            time_ms,
            throughput_per_sec: items as f64 / (time_ms / 1000.0).max(f64::EPSILON),
        }
    }
}

fn demo_requests(count: usize) -> PnlResult<Vec<ScenarioRequest>> {
    let today = chrono::Utc::now().date_naive();
    let payloads = DemoPayloadGenerator::new(42, today)?.batch(count);
    Ok(payloads
        .iter()
        .map(|p| p.inputs.to_request(DEFAULT_DAYS_AXIS.to_vec()))
        .collect())
}

fn run_scenario_benchmarks() -> PnlResult<Vec<BenchmarkResult>> {
    let mut results = Vec::new();
    let generator = ScenarioGenerator::new(ScenarioConfig::default())?;

    for &count in &[1_000, 10_000, 100_000] {
        info!(count, "benchmarking scenario generation");
        let requests = demo_requests(count)?;
        let mut timer = Timer::new();

        timer.start();
        let sequential = requests
            .iter()
            .map(|r| generator.generate(r))
            .collect::<PnlResult<Vec<_>>>()?;
        results.push(BenchmarkResult::new(
            format!("Scenario grids sequential ({}k)", count / 1000),
            count,
            timer.elapsed_ms(),
        ));

        timer.start();
        let parallel = generator
            .generate_batch(&requests)
            .into_iter()
            .collect::<PnlResult<Vec<_>>>()?;
        results.push(BenchmarkResult::new(
            format!("Scenario grids parallel ({}k)", count / 1000),
            count,
            timer.elapsed_ms(),
        ));

        if count == 10_000 {
            let last = DEFAULT_DAYS_AXIS.len() - 1;

            timer.start();
            for set in &parallel {
                ScenarioSummary::compute(set, last)?;
            }
            results.push(BenchmarkResult::new("Summaries (10k)", count, timer.elapsed_ms()));

            timer.start();
            for set in &sequential {
                PnlSurface::from_scenarios(set, &SurfaceOptions::default())?;
            }
            results.push(BenchmarkResult::new("Surfaces (10k)", count, timer.elapsed_ms()));
        }
    }

    Ok(results)
}

fn run_greeks_benchmarks() -> PnlResult<Vec<BenchmarkResult>> {
    let cfg = GreeksSeriesConfig {
        points: 1_001,
        ..Default::default()
    };
    let repeats = 1_000;
    let mut timer = Timer::new();

    timer.start();
    for _ in 0..repeats {
        greeks_series(&cfg)?;
    }
    let series = BenchmarkResult::new("Greeks price sweep", repeats * cfg.points, timer.elapsed_ms());

    timer.start();
    for _ in 0..repeats {
        greeks_decay(&cfg, &DEFAULT_DAYS_AXIS)?;
    }
    let decay = BenchmarkResult::new(
        "Greeks time decay",
        repeats * DEFAULT_DAYS_AXIS.len(),
        timer.elapsed_ms(),
    );

    Ok(vec![series, decay])
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> PnlResult<()> {
    let mut file = BufWriter::new(File::create(filename)?);

    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;
    writeln!(file, "Benchmark,Items,Time_ms,Throughput_per_sec")?;
    for result in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0}",
            result.name, result.items, result.time_ms, result.throughput_per_sec
        )?;
    }
    file.flush()?;
    Ok(())
}

fn main() -> PnlResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("fast-pnl Benchmark Suite");
    println!("========================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let mut all_results = run_scenario_benchmarks()?;
    all_results.extend(run_greeks_benchmarks()?);

    println!("\n{:=<72}", "");
    println!(
        "{:<40} {:>8} {:>10} {:>12}",
        "Benchmark", "Items", "Time (ms)", "Items/sec"
    );
    println!("{:-<72}", "");
    for result in &all_results {
        println!(
            "{:<40} {:>8} {:>10.2} {:>12.0}",
            result.name, result.items, result.time_ms, result.throughput_per_sec
        );
    }
    println!("{:=<72}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    write_results_to_csv(&all_results, &system_info, &filename)?;
    println!("\nResults saved to: {}", filename);
    println!("Run again with: cargo run --bin benchmark --release");
    Ok(())
}
