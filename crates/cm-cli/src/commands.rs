//! Command implementations.

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use cm_engine::NullEngine;
use cm_model::FullSnapshot;
use cm_persistence::{load_snapshot, save_snapshot};
use cm_session::Modeler;
use cm_state::NullSink;

use crate::cli::{ConvertArgs, InspectArgs};

/// Print a summary of a snapshot file.
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.snapshot)
        .with_context(|| format!("cannot read snapshot {}", args.snapshot.display()))?;

    print_header(&snapshot);
    print_stacks(&snapshot);
    if args.detailed {
        print_measurements(&snapshot);
    }
    Ok(())
}

/// Convert a CSV input bundle into a snapshot file.
pub fn run_convert(args: &ConvertArgs) -> anyhow::Result<PathBuf> {
    let bytes = std::fs::read(&args.bundle)
        .with_context(|| format!("cannot read bundle {}", args.bundle.display()))?;

    let mut session = Modeler::new(NullEngine, NullSink);
    session
        .import_data("model.zip", &bytes)
        .with_context(|| format!("cannot import bundle {}", args.bundle.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.bundle.with_extension("json"));
    save_snapshot(&output, &session.export())
        .with_context(|| format!("cannot write snapshot {}", output.display()))?;
    Ok(output)
}

fn print_header(snapshot: &FullSnapshot) {
    let extent = snapshot.grid.extent();
    let resolution = snapshot.grid.resolution();
    println!("version: {} ({})", snapshot.version, snapshot.kind);
    if let Some(saved_at) = &snapshot.saved_at {
        println!("saved:   {saved_at}");
    }
    println!(
        "grid:    x [{} .. {}]  y [{} .. {}]  z [{} .. {}]  at {}x{}x{}",
        extent[0], extent[1], extent[2], extent[3], extent[4], extent[5],
        resolution[0], resolution[1], resolution[2],
    );
    let topography = &snapshot.topography;
    println!(
        "terrain: {} ({}), seed {}",
        if topography.on { "on" } else { "off" },
        topography.category,
        topography.seed,
    );
}

fn print_stacks(snapshot: &FullSnapshot) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("Stack"),
        header_cell("Feature"),
        header_cell("Surfaces"),
        header_cell("Points"),
        header_cell("Orientations"),
    ]);
    for column in [2, 3, 4] {
        if let Some(column) = table.column_mut(column) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    // Newest on top, matching the pane order in the client.
    for stack in snapshot.stacks.iter().rev() {
        let points: usize = stack.surfaces.iter().map(|s| s.points.len()).sum();
        let orientations: usize = stack.surfaces.iter().map(|s| s.orientations.len()).sum();
        table.add_row(vec![
            Cell::new(&stack.name),
            Cell::new(stack.feature),
            Cell::new(stack.surfaces.len()),
            Cell::new(points),
            Cell::new(orientations),
        ]);
    }
    println!("{table}");
}

fn print_measurements(snapshot: &FullSnapshot) {
    for stack in snapshot.stacks.iter().rev() {
        for surface in &stack.surfaces {
            println!("{} / {}", stack.name, surface.name);
            for point in &surface.points {
                println!("  point       {:>10} {:>10} {:>10}", point.x, point.y, point.z);
            }
            for orientation in &surface.orientations {
                println!(
                    "  orientation {:>10} {:>10} {:>10}  pole [{}, {}, {}]",
                    orientation.x,
                    orientation.y,
                    orientation.z,
                    orientation.pole_vector[0],
                    orientation.pole_vector[1],
                    orientation.pole_vector[2],
                );
            }
        }
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}
