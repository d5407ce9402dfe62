// tests/greeks_test.rs
use fast_pnl::analytics::bs_analytic::{bs_price, compute_greeks, compute_greeks_for, OptionKind};
use fast_pnl::analytics::greeks_series::{greeks_decay, greeks_series, GreeksSeriesConfig};

#[test]
fn test_call_gamma_analytic() {
    let s0 = 100.0;
    let k = 100.0;
    let r = 0.05;
    let sigma = 0.20;
    let t = 1.0;

    let analytic_gamma = compute_greeks(s0, k, t, sigma, r).gamma;
    let expected_gamma = 0.018762017345847;

    let rel_error = (analytic_gamma - expected_gamma).abs() / expected_gamma;

    println!("\nAnalytic Gamma: {}", analytic_gamma);
    println!("Expected Gamma: {}", expected_gamma);
    println!("Relative Error (Gamma): {}", rel_error);

    assert!(rel_error < 1e-9, "Relative error for Gamma exceeds tolerance: {}", rel_error);
}

#[test]
fn test_call_vega_per_vol_point() {
    let s0 = 100.0;
    let k = 100.0;
    let r = 0.05;
    let sigma = 0.20;
    let t = 1.0;

    let vega = compute_greeks(s0, k, t, sigma, r).vega;
    // raw ∂C/∂σ = 37.5240..., reported per volatility point
    let expected_vega = 37.524034691693792 / 100.0;

    let rel_error = (vega - expected_vega).abs() / expected_vega;
    println!("\nVega (per vol point): {}", vega);
    assert!(rel_error < 1e-9, "Relative error for Vega exceeds tolerance: {}", rel_error);
}

#[test]
fn test_call_theta_analytic() {
    let theta = compute_greeks(100.0, 100.0, 1.0, 0.20, 0.05).theta;
    let expected_theta = -6.414027546438197;

    let rel_error = ((theta - expected_theta) / expected_theta).abs();
    println!("\nTheta (per year): {}", theta);
    // Φ(d₂) carries the Abramowitz–Stegun error
    assert!(rel_error < 1e-6, "Relative error for Theta exceeds tolerance: {}", rel_error);
}

#[test]
fn test_greeks_match_finite_differences() {
    let (s, k, t, sigma, r) = (105.0, 100.0, 0.4, 0.3, 0.03);

    for kind in [OptionKind::Call, OptionKind::Put] {
        let g = compute_greeks_for(kind, s, k, t, sigma, r);
        let price = |s: f64, t: f64, sigma: f64, r: f64| bs_price(kind, s, k, t, sigma, r);

        let h = 1e-2;
        let fd_delta = (price(s + h, t, sigma, r) - price(s - h, t, sigma, r)) / (2.0 * h);
        let fd_gamma =
            (price(s + h, t, sigma, r) - 2.0 * price(s, t, sigma, r) + price(s - h, t, sigma, r)) / (h * h);
        let fd_vega = price(s, t, sigma + 0.005, r) - price(s, t, sigma - 0.005, r);
        let fd_rho = price(s, t, sigma, r + 0.005) - price(s, t, sigma, r - 0.005);
        // theta is -∂V/∂T
        let dt = 1e-4;
        let fd_theta = -(price(s, t + dt, sigma, r) - price(s, t - dt, sigma, r)) / (2.0 * dt);

        println!("\n{:?}: {:?}", kind, g);
        assert!((g.delta - fd_delta).abs() < 1e-4, "{:?} delta {} vs {}", kind, g.delta, fd_delta);
        assert!((g.gamma - fd_gamma).abs() < 1e-3, "{:?} gamma {} vs {}", kind, g.gamma, fd_gamma);
        assert!((g.vega - fd_vega).abs() < 1e-3, "{:?} vega {} vs {}", kind, g.vega, fd_vega);
        assert!((g.rho - fd_rho).abs() < 1e-3, "{:?} rho {} vs {}", kind, g.rho, fd_rho);
        assert!((g.theta - fd_theta).abs() < 1e-2, "{:?} theta {} vs {}", kind, g.theta, fd_theta);
    }
}

#[test]
fn test_call_greeks_bounds_across_moneyness() {
    for &spot in &[50.0, 80.0, 100.0, 120.0, 200.0] {
        let g = compute_greeks(spot, 100.0, 30.0 / 365.0, 0.25, 0.04);
        assert!((0.0..=1.0).contains(&g.delta), "delta {} at spot {}", g.delta, spot);
        assert!(g.gamma >= 0.0);
        assert!(g.vega >= 0.0);
    }
}

#[test]
fn test_degenerate_inputs_propagate_ieee() {
    let at_expiry = compute_greeks(100.0, 100.0, 0.0, 0.2, 0.05);
    assert!(at_expiry.gamma.is_nan() || at_expiry.gamma.is_infinite());

    let zero_vol = compute_greeks(100.0, 100.0, 0.5, 0.0, 0.05);
    assert!(!zero_vol.is_finite());
}

#[test]
fn test_series_and_decay_are_finite_through_expiration() {
    let cfg = GreeksSeriesConfig {
        spot: 450.0,
        strike: 450.0,
        days_to_expiration: 0,
        volatility: 0.18,
        risk_free_rate: 0.045,
        ..Default::default()
    };
    let series = greeks_series(&cfg).expect("Valid configuration");
    assert_eq!(series.len(), cfg.points);
    assert!(series.iter().all(|p| p.delta.is_finite() && p.gamma.is_finite()));

    let decay = greeks_decay(&cfg, &[30, 21, 14, 7, 3, 1, 0]).expect("Valid configuration");
    assert_eq!(decay.len(), 7);
    assert!(decay.iter().all(|p| p.theta.is_finite() && p.vega.is_finite()));
    // ATM theta bleeds faster close to expiration
    assert!(decay[5].theta < decay[0].theta);
}
