//! Profile Plot
//!
//! Fills a profile with the mean response per x bin and draws it as error
//! bars. Bins that received no entries are dropped before drawing.
//!
//! Run with: `cargo run --example profile_plot`

use trueno_hist::prelude::*;

struct Lcg(u64);

impl Lcg {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn main() {
    println!("Profile Example");
    println!("===============\n");

    // Step 1: Fill, leaving a gap between 40 and 60
    println!("Step 1: Filling profile...");
    let mut profile = Profile1D::uniform("response", 25, 0.0, 100.0).expect("valid binning");
    let mut rng = Lcg(99);
    for _ in 0..5_000 {
        let x = rng.uniform() * 100.0;
        if (40.0..60.0).contains(&x) {
            continue;
        }
        let y = 0.9 + 0.1 * (x / 100.0) + (rng.uniform() - 0.5) * 0.2;
        profile.fill(x, y);
    }
    println!("  Entries: {}", profile.entries());

    // Step 2: Extract
    println!("\nStep 2: Extracting...");
    let series = BinnedSeries::extract(&profile).expect("profile extracts");
    let layer = ErrorBarLayer::profile(&series).label("mean response");
    println!("  Bins: {} filled of {}", layer.series().len(), series.len());

    // Step 3: Render
    println!("\nStep 3: Rendering...");
    let plot = PlotOptions::default()
        .labels("p_T [GeV]", "<response>")
        .legend(LegendPlacement::LowerRight);
    let mut figure = Figure::new(plot).expect("valid options");
    figure.draw(layer);
    let finished = figure.finalize().expect("figure has data");

    // Step 4: Save
    println!("\nStep 4: Saving...");
    finished.save("profile_plot.png").expect("Failed to write PNG");
    println!("  Saved to: profile_plot.png");
}
