use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use osmw_cli::pipeline::WrangleResult;

pub fn print_summary(result: &WrangleResult) {
    println!("Input: {}", result.input.display());
    println!("Documents: {}", result.documents_path.display());
    println!("Audit log: {}", result.audit_log_path.display());
    if let Some(path) = &result.collection_path {
        println!("Collection: {}", path.display());
    }
    if let Some(path) = &result.insert_error_log {
        println!("Insert errors: {}", path.display());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table.add_row(vec![Cell::new("Elements read"), Cell::new(result.elements_seen)]);
    table.add_row(vec![Cell::new("Records built"), Cell::new(result.records_built)]);
    table.add_row(vec![
        Cell::new("Elements skipped"),
        Cell::new(result.elements_skipped),
    ]);
    if result.collection_path.is_some() {
        table.add_row(vec![Cell::new("Inserted"), Cell::new(result.inserted)]);
        table.add_row(vec![
            Cell::new("Insert failures"),
            count_cell(result.insert_failures, Color::Red),
        ]);
    }
    println!("{table}");
    println!("Elapsed: {:.2?}", result.elapsed);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count)
    }
}
