use std::fmt::Write;

use colored::{ColoredString, Colorize};
use itertools::Itertools;
use libautomaton::{
    Automaton,
    cell::{DormantCell, LifeCell},
};

use crate::State;

const PANEL_GAP: &str = "    ";

/// Draws both automatons side by side, binary on the left and dormant on the right.
pub fn render(state: &State) -> String {
    let side = state.life.grid().side();
    let panel_width = side * 2;

    let mut frame = String::new();

    let life_title = format!(
        "life {}: N_alive = {}",
        state.life.rule(),
        state.life.alive_count()
    );
    let dormant_title = format!(
        "dormant (alpha = {}): N_alive = {}, {} went dormant, {} woke",
        state.decay_factor,
        state.dormant.alive_count(),
        state.flows.went_dormant,
        state.flows.woke,
    );
    let _ = writeln!(
        frame,
        "t = {}\n{:<panel_width$}{PANEL_GAP}{}",
        state.life.t(),
        life_title.bold(),
        dormant_title.bold(),
    );

    for (life_row, dormant_row) in state.life.grid().rows().zip(state.dormant.grid().rows()) {
        let life_row = life_row.iter().map(|&cell| life_glyph(cell)).join("");
        let dormant_row = dormant_row.iter().map(|&cell| dormant_glyph(cell)).join("");
        let _ = writeln!(frame, "{life_row}{PANEL_GAP}{dormant_row}");
    }

    frame
}

fn life_glyph(cell: LifeCell) -> ColoredString {
    match cell {
        LifeCell::Dead => "  ".normal(),
        LifeCell::Alive => "██".bright_white(),
    }
}

fn dormant_glyph(cell: DormantCell) -> ColoredString {
    match cell {
        DormantCell::Dead => "  ".normal(),
        DormantCell::Alive => "██".bright_white(),
        DormantCell::Dormant => "░░".blue(),
    }
}
