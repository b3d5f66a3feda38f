//! Stacked Histograms with a Data/MC Ratio
//!
//! Fills three background histograms and a pseudo-data histogram, stacks
//! the backgrounds, overlays the data as error bars and draws data over
//! the stack total in a ratio panel.
//!
//! Run with: `cargo run --example stacked_ratio`

use trueno_hist::prelude::*;

/// Small deterministic generator so the output is reproducible.
struct Lcg(u64);

impl Lcg {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximately normal, from the sum of twelve uniforms.
    fn normal(&mut self, mean: f64, sigma: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.uniform()).sum();
        mean + (sum - 6.0) * sigma
    }

    /// Exponential with the given slope.
    fn exponential(&mut self, slope: f64) -> f64 {
        -(1.0 - self.uniform()).ln() * slope
    }
}

fn main() {
    println!("Stacked Histogram Example");
    println!("=========================\n");

    let mut rng = Lcg(20_240_601);

    // Step 1: Fill the backgrounds and the pseudo-data
    println!("Step 1: Filling histograms...");
    let mut ttbar = Hist1D::uniform("ttbar", 30, 0.0, 300.0).expect("valid binning");
    let mut wjets = Hist1D::uniform("wjets", 30, 0.0, 300.0).expect("valid binning");
    let mut qcd = Hist1D::uniform("qcd", 30, 0.0, 300.0).expect("valid binning");
    let mut data = Hist1D::uniform("data", 30, 0.0, 300.0).expect("valid binning");

    for _ in 0..4_000 {
        ttbar.fill(rng.normal(170.0, 35.0));
    }
    for _ in 0..6_000 {
        wjets.fill(rng.exponential(60.0) + 20.0);
    }
    for _ in 0..3_000 {
        qcd.fill(rng.exponential(25.0));
    }
    for _ in 0..4_200 {
        data.fill(rng.normal(170.0, 35.0));
    }
    for _ in 0..6_000 {
        data.fill(rng.exponential(60.0) + 20.0);
    }
    for _ in 0..3_000 {
        data.fill(rng.exponential(25.0));
    }
    println!("  Entries: ttbar={} wjets={} qcd={} data={}", ttbar.entries(), wjets.entries(), qcd.entries(), data.entries());

    // Step 2: Build the stack
    println!("\nStep 2: Building stack...");
    let options = StackOptions::stacked().labels(["QCD", "W+jets", "ttbar"]);
    let stack = HistStack::from_sources(&[&qcd, &wjets, &ttbar], options)
        .expect("consistent binning")
        .with_data(BinnedSeries::extract(&data).expect("data extracts"))
        .with_data_ratio()
        .expect("data matches stack binning");

    let total = stack.total().expect("consistent binning");
    println!("  Stack integral: {:.0}", total.integral());

    // Step 3: Lay out and render
    println!("\nStep 3: Rendering...");
    let mut ratio = RatioPanel { y_label: "Data / MC".to_string(), ..RatioPanel::default() };
    ratio.limits = Some(AxisLimits::new(0.5, 1.5).expect("valid limits"));
    let plot = PlotOptions::default()
        .dimensions(900, 700)
        .title("Lepton + jets")
        .labels("m_T [GeV]", "Events / 10 GeV")
        .ratio_panel(ratio);

    let mut figure = Figure::new(plot).expect("valid options");
    stack.draw(&mut figure).expect("figure has a ratio panel");
    let finished = figure.finalize().expect("figure has data");

    // Step 4: Save
    println!("\nStep 4: Saving...");
    finished.save("stacked_ratio.png").expect("Failed to write PNG");
    finished.save("stacked_ratio.svg").expect("Failed to write SVG");
    println!("  Saved to: stacked_ratio.png, stacked_ratio.svg");

    println!("\n{}", finished.to_terminal(&TerminalEncoder::new().mode(TerminalMode::Ascii)).expect("render"));
}
