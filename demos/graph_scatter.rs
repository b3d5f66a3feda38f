//! Graph Scatter Plot
//!
//! Draws the points of a graph as connected markers, with plot options
//! loaded from YAML.
//!
//! Run with: `cargo run --example graph_scatter`

use trueno_hist::prelude::*;

const OPTIONS: &str = r#"
width: 700
height: 500
title: Efficiency turn-on
x_label: E_T [GeV]
y_label: efficiency
legend: lower_right
"#;

fn main() {
    println!("Graph Scatter Example");
    println!("=====================\n");

    // Step 1: Build the graph
    println!("Step 1: Building graph...");
    let x: Vec<f64> = (0..40).map(|i| f64::from(i) * 2.5).collect();
    let y: Vec<f64> = x.iter().map(|&e| 0.5 * (1.0 + ((e - 40.0) / 12.0).tanh())).collect();
    let graph = Graph::new("turn_on", &x, &y).expect("equal lengths");

    let points = PointSeries::extract(&graph).expect("graph extracts");
    println!("  Points: {}", points.len());

    // Step 2: Render
    println!("\nStep 2: Rendering...");
    let plot = PlotOptions::from_yaml(OPTIONS).expect("valid options");
    let mut figure = Figure::new(plot).expect("valid options");
    figure.draw(
        ScatterLayer::new(points)
            .color(Rgba::cycle(0))
            .marker(MarkerShape::Square)
            .connect(true)
            .label("single-electron trigger"),
    );
    let finished = figure.finalize().expect("figure has data");

    // Step 3: Save
    println!("\nStep 3: Saving...");
    finished.save("graph_scatter.svg").expect("Failed to write SVG");
    println!("  Saved to: graph_scatter.svg");
}
