//! Terminal table rendering.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};
use mwb_core::{PreviewLimits, TableRenderer};
use mwb_model::CanonicalTable;

const ELLIPSIS: &str = "...";

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Renders table previews with `comfy-table`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComfyTableRenderer;

impl ComfyTableRenderer {
    /// Builds the preview table; truncated rows and columns show as `...`.
    pub fn build(table: &CanonicalTable, limits: PreviewLimits) -> Table {
        let names = table.column_names();
        let shown_columns = names.len().min(limits.max_columns);
        let columns_cut = names.len() > shown_columns;

        let mut header: Vec<Cell> = names[..shown_columns].iter().map(Cell::new).collect();
        if columns_cut {
            header.push(Cell::new(ELLIPSIS));
        }

        let mut preview = Table::new();
        preview.set_header(header);
        apply_table_style(&mut preview);
        for row in table.rows().iter().take(limits.max_rows) {
            let mut values: Vec<String> = Vec::with_capacity(names.len());
            values.push(row.sample_key.clone());
            values.push(row.class_label.clone());
            if table.class_code_column().is_some() {
                values.push(row.class_code.as_ref().map(ToString::to_string).unwrap_or_default());
            }
            values.extend(row.features.iter().map(ToString::to_string));
            values.truncate(shown_columns);
            if columns_cut {
                values.push(ELLIPSIS.to_string());
            }
            preview.add_row(values);
        }
        if table.row_count() > limits.max_rows {
            let width = shown_columns + usize::from(columns_cut);
            preview.add_row(vec![ELLIPSIS; width]);
        }
        preview
    }
}

impl TableRenderer for ComfyTableRenderer {
    fn render_table(&self, table: &CanonicalTable, limits: PreviewLimits) -> String {
        let preview = Self::build(table, limits);
        format!(
            "{preview}\n[{} rows x {} columns]",
            table.row_count(),
            table.column_count()
        )
    }
}
