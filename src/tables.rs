use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::engine::{Action, Decision};

pub fn build_decisions_table(decisions: &[Decision]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Date", "Time", "Action", "Price", "Rank", "Reason"]);
    for decision in decisions {
        table.add_row(vec![
            Cell::new(decision.timestamp.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(decision.timestamp.format("%H:%M")),
            Cell::new(decision.action).fg(match decision.action {
                Action::Heat => Color::Green,
                Action::Block => Color::Red,
            }),
            Cell::new(decision.price).set_alignment(CellAlignment::Right),
            Cell::new(decision.rank.map_or_else(String::new, |rank| format!("#{rank}")))
                .add_attribute(Attribute::Dim),
            Cell::new(&decision.reason),
        ]);
    }
    table
}
