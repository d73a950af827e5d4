// tests/pricing_test.rs
use fast_iv::analytics::bs_analytic::{self, OptionKind};

#[test]
fn test_reference_call_price() {
    let price = bs_analytic::bs_call_price(100.0, 100.0, 0.02, 0.0, 0.20, 1.0);
    println!("\nATM call price: {:.10}", price);
    assert!((price - 8.9160).abs() < 5e-5, "call price {} not ≈ 8.9160", price);
}

#[test]
fn test_put_call_parity() {
    let spots = [60.0, 95.0, 100.0, 140.0];
    let strikes = [50.0, 100.0, 180.0];
    let rates = [-0.01, 0.0, 0.05];
    let yields = [0.0, 0.03];
    let vols = [0.05, 0.2, 0.8, 2.5];
    let times = [1.0 / 365.0, 0.25, 1.0, 5.0];

    let mut worst: f64 = 0.0;
    for &s in &spots {
        for &k in &strikes {
            for &r in &rates {
                for &q in &yields {
                    for &sigma in &vols {
                        for &t in &times {
                            let call = bs_analytic::bs_call_price(s, k, r, q, sigma, t);
                            let put = bs_analytic::bs_put_price(s, k, r, q, sigma, t);
                            let forward = s * (-q * t).exp() - k * (-r * t).exp();
                            worst = worst.max((call - put - forward).abs());
                        }
                    }
                }
            }
        }
    }

    println!("\nWorst put-call parity violation: {:e}", worst);
    assert!(worst < 1e-6, "put-call parity violated by {}", worst);
}

#[test]
fn test_price_strictly_increasing_in_vol() {
    for kind in [OptionKind::Call, OptionKind::Put] {
        for &k in &[70.0, 100.0, 130.0] {
            let mut prev_sigma = 0.01;
            let mut prev = bs_analytic::bs_price(100.0, k, 0.03, 0.01, prev_sigma, 0.5, kind);
            for step in 2..=300 {
                let sigma = step as f64 * 0.01;
                let p = bs_analytic::bs_price(100.0, k, 0.03, 0.01, sigma, 0.5, kind);
                // where vega is negligible the increase is below f64 resolution
                if bs_analytic::bs_vega(100.0, k, 0.03, 0.01, prev_sigma, 0.5) > 1e-3 {
                    assert!(p > prev, "{:?} K={} not increasing at sigma={}", kind, k, sigma);
                } else {
                    assert!(p >= prev - 1e-12, "{:?} K={} decreasing at sigma={}", kind, k, sigma);
                }
                prev = p;
                prev_sigma = sigma;
            }
        }
    }
}

#[test]
fn test_low_vol_limit_is_discounted_intrinsic() {
    let (s, r, q, t) = (100.0, 0.02, 0.01, 1.0);
    for &k in &[80.0, 100.0, 120.0] {
        let call = bs_analytic::bs_call_price(s, k, r, q, 1e-4, t);
        let intrinsic: f64 = (s * (-q * t).exp() - k * (-r * t).exp()).max(0.0);
        println!("K={}: call(σ→0) = {:.10}, intrinsic = {:.10}", k, call, intrinsic);
        assert!((call - intrinsic).abs() < 1e-6);
    }
}

#[test]
fn test_high_vol_limit_is_discounted_spot() {
    let (s, r, q, t) = (100.0, 0.02, 0.01, 1.0);
    let call = bs_analytic::bs_call_price(s, 100.0, r, q, 50.0, t);
    let bound = s * (-q * t).exp();
    assert!((call - bound).abs() < 1e-6, "call {} vs S e^(-qT) {}", call, bound);
    assert!(call <= bound);
}

#[test]
fn test_short_maturity_is_finite() {
    let t = 1.0 / 365.0;
    for kind in [OptionKind::Call, OptionKind::Put] {
        let p = bs_analytic::bs_price(100.0, 100.0, 0.02, 0.0, 0.2, t, kind);
        let g = bs_analytic::bs_greeks(100.0, 100.0, 0.02, 0.0, 0.2, t, kind);
        assert!(p.is_finite() && p > 0.0);
        assert!(g.delta.is_finite() && g.gamma.is_finite() && g.vega.is_finite());
        assert!(g.theta.is_finite() && g.rho.is_finite());
    }
}
