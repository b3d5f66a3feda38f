//! 2-D Histogram Heatmap
//!
//! Fills a 19x13 two-dimensional histogram with a correlated Gaussian blob,
//! strips the under/overflow ring and draws it as a heatmap in histogram
//! coordinates with a colorbar.
//!
//! Run with: `cargo run --example th2d_heatmap`

use trueno_hist::prelude::*;

struct Lcg(u64);

impl Lcg {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn normal(&mut self) -> f64 {
        (0..12).map(|_| self.uniform()).sum::<f64>() - 6.0
    }
}

fn main() {
    println!("2-D Histogram Heatmap Example");
    println!("=============================\n");

    // Step 1: Fill
    println!("Step 1: Filling 19x13 histogram...");
    let mut hist = Hist2D::uniform("eta_phi", (19, -2.5, 2.5), (13, -3.2, 3.2)).expect("valid binning");
    let mut rng = Lcg(7);
    for _ in 0..50_000 {
        let a = rng.normal();
        let b = rng.normal();
        hist.fill(a * 0.9, 0.6 * a + 0.8 * b);
    }
    println!("  Entries: {}", hist.entries());

    // Step 2: Extract without the flow ring
    println!("\nStep 2: Extracting grid...");
    let grid = Grid2D::extract(&hist, true).expect("buffer matches axes");
    let (rows, cols) = grid.shape();
    println!("  Grid: {rows} rows (y) x {cols} columns (x)");
    if let Some((lo, hi)) = grid.extent() {
        println!("  Values: {lo:.0} .. {hi:.0}");
    }

    // Step 3: Render with axes in histogram units
    println!("\nStep 3: Rendering...");
    let layer = HeatmapLayer::with_palette(grid, Palette::Viridis)
        .expect("grid has values")
        .x_range(-2.5, 2.5)
        .expect("valid range")
        .y_range(-3.2, 3.2)
        .expect("valid range");

    let mut plot = PlotOptions::default().labels("eta", "phi").title("Jet occupancy");
    plot.margins.right = 0.16;
    let mut figure = Figure::new(plot).expect("valid options");
    figure.draw(layer);
    let finished = figure.finalize().expect("figure has data");

    // Step 4: Save
    println!("\nStep 4: Saving...");
    finished.save("th2d_heatmap.png").expect("Failed to write PNG");
    finished.save("th2d_heatmap.svg").expect("Failed to write SVG");
    println!("  Saved to: th2d_heatmap.png, th2d_heatmap.svg");
}
