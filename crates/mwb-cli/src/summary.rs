use std::io::{self, Write};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use mwb_core::{
    CheckOutcome, TableRenderer, UifPlan, write_class_information, write_store_listing,
};
use mwb_model::UifData;

use mwb_cli::render::ComfyTableRenderer;

use crate::commands::RunResult;

pub fn print_summary(result: &RunResult) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let comfy = ComfyTableRenderer;
    let renderer: Option<&dyn TableRenderer> = result.show_tables.then_some(&comfy);
    write_store_listing(&result.assembly.store, &mut out, renderer)?;

    if let Some((study_id, analysis_id)) = &result.class_info {
        writeln!(out)?;
        write_class_information(
            &result.assembly.store,
            study_id,
            analysis_id,
            result.origin,
            None,
            &mut out,
        )?;
    }

    writeln!(out)?;
    print_check(&mut out, &result.store_check)?;
    if !result.plan.data.is_empty() {
        writeln!(out, "{}", uif_table(&result.plan.data))?;
    }
    print_exclusions(&mut out, &result.plan)?;
    print_check(&mut out, &result.uif_check)?;

    for path in &result.exports {
        writeln!(out, "Exported: {}", path.display())?;
    }
    if !result.assembly.diagnostics.is_empty() {
        eprintln!("Warnings:");
        for diagnostic in &result.assembly.diagnostics {
            eprintln!("- {diagnostic}");
        }
    }
    Ok(())
}

fn print_check<W: Write>(out: &mut W, check: &CheckOutcome) -> io::Result<()> {
    if check.is_empty() {
        writeln!(out, "***Warning: {}", check.message())
    } else {
        writeln!(out, "{}", check.message())
    }
}

fn print_exclusions<W: Write>(out: &mut W, plan: &UifPlan) -> io::Result<()> {
    for exclusion in &plan.exclusions {
        writeln!(out, "***Warning: {exclusion}...")?;
    }
    if let Some(warning) = plan.warning() {
        writeln!(out, "***Warning: {warning}...")?;
    }
    Ok(())
}

/// One row per qualifying analysis.
pub fn uif_table(data: &UifData) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Study"),
        header_cell("Analysis"),
        header_cell("Metabolites"),
        header_cell("Classes"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    let mut total_metabolites = 0usize;
    for study in data.studies() {
        for analysis in &study.analyses {
            total_metabolites += analysis.metabolite_ids.len();
            table.add_row(vec![
                Cell::new(&study.study_id),
                Cell::new(&analysis.analysis_id),
                Cell::new(analysis.metabolite_ids.len()),
                Cell::new(analysis.class_ids.len()),
            ]);
        }
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_metabolites).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
