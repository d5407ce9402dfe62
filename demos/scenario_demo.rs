// demos/scenario_demo.rs
use chrono::Utc;
use fast_pnl::analytics::{greeks_decay, GreeksSeriesConfig};
use fast_pnl::demo::DemoPayloadGenerator;
use fast_pnl::math_utils::Timer;
use fast_pnl::metrics::{time_frame_labels, PnlSurface, ScenarioSummary, SurfaceOptions};
use fast_pnl::output;
use fast_pnl::scenario::{ScenarioConfig, ScenarioGenerator, ScenarioRequest};
use fast_pnl::PnlResult;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let export_dir = args
        .iter()
        .position(|a| a == "--export")
        .and_then(|i| args.get(i + 1).cloned());
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    if let Err(e) = run_demo_mode(seed, export_dir.as_deref()) {
        eprintln!("demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run_demo_mode(seed: u64, export_dir: Option<&str>) -> PnlResult<()> {
    println!("Running fast-pnl Scenario Demo\n");

    let today = Utc::now().date_naive();
    let payloads = DemoPayloadGenerator::new(seed, today)?.batch(6);

    let generator = ScenarioGenerator::new(ScenarioConfig::default())?;
    let requests: Vec<ScenarioRequest> = payloads
        .iter()
        .map(|p| p.inputs.to_request(p.inputs.days_axis(today)))
        .collect();

    let mut timer = Timer::new();
    timer.start();
    let results = generator.generate_batch(&requests);
    info!(
        grids = results.len(),
        elapsed_ms = timer.elapsed_ms(),
        "generated scenario batch"
    );

    for (i, (payload, result)) in payloads.iter().zip(results).enumerate() {
        let set = match result {
            Ok(set) => set,
            Err(e) => {
                warn!(index = i, error = %e, "skipping payload");
                continue;
            }
        };
        let inputs = &payload.inputs;
        let last = set.days_axis().len().saturating_sub(1);

        println!(
            "--- #{} {} | spot {:.2} strike {:.2} debit {:.2} IV {:.1}% ---",
            i,
            inputs.strategy,
            inputs.current_price,
            inputs.strike,
            inputs.net_debit,
            payload.implied_volatility * 100.0
        );
        println!("Checkpoints: {}", time_frame_labels(set.days_axis()).join(", "));

        let summary = ScenarioSummary::compute(&set, last)?;
        println!("At {} days:", summary.days_to_expiration);
        println!("  Max profit:           {:>10.2}", summary.max_profit);
        println!("  Max loss:             {:>10.2}", summary.max_loss);
        println!("  Probability of profit {:>9.1}%", summary.probability_of_profit * 100.0);
        println!("  Win rate              {:>9.1}%", summary.win_rate * 100.0);
        println!("  Expected P&L:         {:>10.2}", summary.expected_pnl);
        for b in &summary.breakevens {
            println!("  Breakeven:            {:>10.2} ({:+.2}%)", b.price, b.price_change_percent);
        }

        let greeks = greeks_decay(
            &GreeksSeriesConfig {
                spot: inputs.current_price,
                strike: inputs.strike,
                volatility: payload.implied_volatility,
                risk_free_rate: payload.risk_free_rate,
                ..Default::default()
            },
            set.days_axis(),
        )?;
        if let Some(front) = greeks.first() {
            println!(
                "  Call Greeks @ {}d: delta {:.4} gamma {:.4} theta/day {:.4} vega {:.4}",
                front.days_to_expiration,
                front.delta,
                front.gamma,
                front.theta_per_day(),
                front.vega
            );
        }

        let surface = PnlSurface::from_scenarios(&set, &SurfaceOptions::default())?;
        println!(
            "  Surface {}x{}, range [{:.2}, {:.2}]\n",
            surface.pnl_matrix.nrows(),
            surface.pnl_matrix.ncols(),
            surface.metadata.max_loss,
            surface.metadata.max_profit
        );

        if let Some(dir) = export_dir {
            std::fs::create_dir_all(dir)?;
            let base = std::path::Path::new(dir);
            output::write_scenarios_to_csv(base.join(format!("scenarios_{}.csv", i)), &set)?;
            output::write_surface_to_csv(base.join(format!("surface_{}.csv", i)), &surface)?;
            output::write_json(base.join(format!("summary_{}.json", i)), &summary)?;
        }
    }

    if let Some(dir) = export_dir {
        println!("Exported charts to {}", dir);
    }
    Ok(())
}
