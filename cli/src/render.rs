use sapper_core::{CellView, GameSession, GameStatus};
use std::fmt::Write as _;

pub(crate) fn format_for_counter(num: i64) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

pub(crate) const fn glyph(view: CellView) -> char {
    match view {
        CellView::Hidden => '.',
        CellView::Flagged => 'F',
        CellView::Revealed(0) => ' ',
        CellView::Revealed(n) if n < 10 => (b'0' + n) as char,
        CellView::Revealed(_) => '?',
        CellView::Mine => '*',
        CellView::Exploded => 'X',
        CellView::MisFlagged => 'x',
    }
}

fn status_line(session: &GameSession) -> String {
    let time = match session.time_left() {
        Some(left) => format!("left {}", format_for_counter(left.into())),
        None => format!("time {}", format_for_counter(session.elapsed_seconds().into())),
    };
    let face = match session.status() {
        GameStatus::Playing => ":)",
        GameStatus::Won => "B)",
        GameStatus::Lost => "X(",
    };
    format!(
        "mines {}  {}  {}",
        format_for_counter(session.mines_remaining() as i64),
        face,
        time
    )
}

/// Text rendering with row and column indices along the edges.
pub(crate) fn board(session: &GameSession) -> String {
    let snapshot = session.snapshot();
    let (_, cols) = snapshot.cells.dim();
    let mut out = status_line(session);
    out.push('\n');

    out.push_str("    ");
    for col in 0..cols {
        let _ = write!(out, "{}", col % 10);
    }
    out.push('\n');

    for (row, cells) in snapshot.cells.rows().into_iter().enumerate() {
        let _ = write!(out, "{row:>3} ");
        out.extend(cells.iter().map(|&view| glyph(view)));
        out.push('\n');
    }
    out
}

pub(crate) fn status_message(status: GameStatus) -> Option<&'static str> {
    match status {
        GameStatus::Playing => None,
        GameStatus::Won => Some("You Win!"),
        GameStatus::Lost => Some("Game Over"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::Board;

    #[test]
    fn counter_is_clamped_to_three_chars() {
        assert_eq!(format_for_counter(-150), "-99");
        assert_eq!(format_for_counter(-5), "-05");
        assert_eq!(format_for_counter(0), "000");
        assert_eq!(format_for_counter(42), "042");
        assert_eq!(format_for_counter(1234), "999");
    }

    #[test]
    fn renders_revealed_and_hidden_cells() {
        let layout = Board::from_mine_coords(2, 3, &[(0, 2)]).unwrap();
        let mut session = GameSession::with_board(layout, None);
        session.reveal((1, 0)).unwrap();
        session.toggle_flag((0, 2)).unwrap();

        let text = board(&session);

        assert_eq!(
            text,
            ["mines 000  :)  time 000", "    012", "  0  1F", "  1  1.", ""].join("\n")
        );
    }

    #[test]
    fn renders_loss() {
        let layout = Board::from_mine_coords(1, 3, &[(0, 0)]).unwrap();
        let mut session = GameSession::with_board(layout, None);
        session.toggle_flag((0, 2)).unwrap();
        session.reveal((0, 0)).unwrap();

        let text = board(&session);

        assert!(text.starts_with("mines 000  X(  time 000"));
        assert!(text.ends_with("  0 X.x\n"));
        assert_eq!(status_message(session.status()), Some("Game Over"));
    }
}
