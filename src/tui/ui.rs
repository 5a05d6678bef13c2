//! Stateless UI rendering for the shell game.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use shell_game_core::{CupId, SlotIndex};
use tokio::time::Instant;

use super::stage::TerminalStage;

/// Width of one cup drawing in columns.
pub const CUP_WIDTH: u16 = 9;

const CUP_ART: [&str; 3] = ["  _____  ", " /     \\ ", "/_______\\"];

/// Rows of the table area: banner, lift gap, cup, ball, label.
const TABLE_HEIGHT: u16 = 8;

/// Splits the frame into its fixed rows; the table row is full width.
pub fn split(area: Rect) -> [Rect; 5] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Title
            Constraint::Length(1),            // Difficulty and score
            Constraint::Min(TABLE_HEIGHT),    // Table
            Constraint::Length(3),            // Status
            Constraint::Length(1),            // Key help
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3], chunks[4]]
}

/// Renders one frame.
pub fn draw(frame: &mut Frame, stage: &TerminalStage, now: Instant) {
    let [title_area, info_area, table_area, status_area, help_area] = split(frame.area());

    let title = Paragraph::new("Shell Game - Find the Ball")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, title_area);

    draw_info(frame, info_area, stage);
    draw_table(frame, table_area, stage, now);

    let status = Paragraph::new(stage.message().to_string())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, status_area);

    let help = Paragraph::new("s start  1-3 / ←→ space pick  d difficulty  r reset  q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, help_area);
}

fn draw_info(frame: &mut Frame, area: Rect, stage: &TerminalStage) {
    let board = stage.scoreboard();
    let line = Line::from(vec![
        Span::raw("Difficulty: "),
        Span::styled(
            stage.difficulty().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  speed: {} ms", stage.speed().as_millis())),
        Span::raw("    Score: "),
        Span::styled(
            board.score().to_string(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Rounds: "),
        Span::styled(
            board.rounds().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_table(frame: &mut Frame, area: Rect, stage: &TerminalStage, now: Instant) {
    if stage.is_celebrating(now) {
        let banner = Paragraph::new("* + * + *  You found it!  * + * + *")
            .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(banner, row(area, 0));
    }

    for cup in CupId::ALL {
        let Some(x) = stage.cup_x(cup, now) else {
            continue;
        };
        let slot = stage.cup_slot(cup);
        let top = if stage.is_lifted(slot) { 1 } else { 2 };
        let cup_area = centered(area, x, CUP_WIDTH, top, CUP_ART.len() as u16);
        let art = Paragraph::new(CUP_ART.iter().map(|l| Line::from(*l)).collect::<Vec<_>>())
            .style(cup_style(stage, slot, now));
        frame.render_widget(art, cup_area);
    }

    for slot in SlotIndex::ALL {
        let Some(x) = stage.slot_x(slot) else {
            continue;
        };
        let label_style = if stage.picking_enabled() && stage.cursor() == slot {
            Style::default().bg(Color::White).fg(Color::Black)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let label = Paragraph::new(format!("[{}]", slot.label())).style(label_style);
        frame.render_widget(label, centered(area, x, 3, 7, 1));
    }

    if let Some(x) = stage.visible_token_x() {
        let ball = Paragraph::new("●").style(Style::default().fg(Color::White));
        frame.render_widget(ball, centered(area, x, 1, 5, 1));
    }
}

fn cup_style(stage: &TerminalStage, slot: SlotIndex, now: Instant) -> Style {
    if stage.is_revealed(slot) {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if stage.is_flourishing(slot, now) {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if stage.picking_enabled() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red)
    }
}

/// A `width` x `height` box centered on column `x`, `top` rows into `area`,
/// clipped to `area`.
fn centered(area: Rect, x: f32, width: u16, top: u16, height: u16) -> Rect {
    let left = (x - f32::from(width) / 2.0).round().max(0.0) as u16;
    Rect::new(
        area.x.saturating_add(left),
        area.y.saturating_add(top),
        width,
        height,
    )
    .intersection(area)
}

fn row(area: Rect, offset: u16) -> Rect {
    Rect::new(area.x, area.y.saturating_add(offset), area.width, 1).intersection(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_box_is_clipped() {
        let area = Rect::new(0, 10, 20, 8);
        let rect = centered(area, 18.0, CUP_WIDTH, 2, 3);
        assert_eq!(rect.y, 12);
        assert!(rect.right() <= area.right());

        let left = centered(area, 0.0, CUP_WIDTH, 0, 1);
        assert_eq!(left.x, 0);
    }

    #[test]
    fn test_split_gives_table_full_width() {
        let [_, _, table, _, _] = split(Rect::new(0, 0, 80, 24));
        assert_eq!(table.width, 80);
        assert!(table.height >= TABLE_HEIGHT);
    }
}
