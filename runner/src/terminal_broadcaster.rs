use std::io::Write;

use snake_common::games::snake::{
    GRID_SIZE, GameBroadcaster, GameOverSummary, GamePhase, GameSnapshot, Point,
};
use tokio::sync::mpsc;

/// Draws every snapshot as text on stdout and forwards game-over summaries
/// to the main loop.
#[derive(Clone)]
pub struct TerminalBroadcaster {
    game_over_tx: mpsc::UnboundedSender<GameOverSummary>,
}

impl TerminalBroadcaster {
    pub fn new(game_over_tx: mpsc::UnboundedSender<GameOverSummary>) -> Self {
        Self { game_over_tx }
    }
}

pub fn render_board(snapshot: &GameSnapshot) -> String {
    let mut rows = vec![vec!['.'; GRID_SIZE]; GRID_SIZE];
    let mut put = |point: Point, symbol: char| {
        if let Some(cell) = rows.get_mut(point.y).and_then(|row| row.get_mut(point.x)) {
            *cell = symbol;
        }
    };

    put(snapshot.food, '*');
    for segment in snapshot.snake.iter().skip(1) {
        put(*segment, 'o');
    }
    if let Some(head) = snapshot.head() {
        put(head, '@');
    }

    let status = match snapshot.phase {
        GamePhase::Idle => "press n to start",
        GamePhase::Playing => "playing",
        GamePhase::Paused => "paused",
        GamePhase::GameOver => "game over, press r for a new game",
    };

    let mut out = format!("Score: {}  ({})\n", snapshot.score, status);
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}

pub fn render_summary(summary: &GameOverSummary) -> String {
    let mut out = format!(
        "Game over: the snake {}. Final score: {}\n",
        summary.reason, summary.final_score
    );
    match &summary.high_score {
        Ok(report) if report.is_new_high_score => out.push_str("New high score!\n"),
        Ok(report) => out.push_str(&format!("High score: {}\n", report.stored_high_score)),
        Err(e) => out.push_str(&format!("Could not save your score: {}\n", e)),
    }
    out
}

fn print(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "{}", text);
    let _ = stdout.flush();
}

impl GameBroadcaster for TerminalBroadcaster {
    async fn broadcast_state(&self, snapshot: GameSnapshot) {
        print(&render_board(&snapshot));
    }

    async fn broadcast_game_over(&self, summary: GameOverSummary) {
        print(&render_summary(&summary));
        let _ = self.game_over_tx.send(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_common::games::snake::{Direction, GameEndReason};
    use snake_common::scores::ScoreReport;

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            snake: vec![Point::new(1, 0), Point::new(0, 0)],
            food: Point::new(3, 1),
            direction: Direction::Right,
            score: 20,
            terminal: false,
            active: true,
            phase: GamePhase::Playing,
            end_reason: None,
        }
    }

    #[test]
    fn test_render_board_marks_head_body_and_food() {
        let board = render_board(&snapshot());
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines[0], "Score: 20  (playing)");
        assert!(lines[1].starts_with("o@.."));
        assert!(lines[2].starts_with("...*"));
        assert_eq!(lines.len(), GRID_SIZE + 1);
    }

    #[test]
    fn test_render_summary_reports_failure() {
        let summary = GameOverSummary {
            final_score: 30,
            reason: GameEndReason::SelfCollision,
            high_score: Err("disk full".to_string()),
        };
        let text = render_summary(&summary);
        assert!(text.contains("ran into itself"));
        assert!(text.contains("Could not save your score: disk full"));
    }

    #[test]
    fn test_render_summary_new_high_score() {
        let summary = GameOverSummary {
            final_score: 30,
            reason: GameEndReason::WallCollision,
            high_score: Ok(ScoreReport {
                is_new_high_score: true,
                stored_high_score: 30,
            }),
        };
        assert!(render_summary(&summary).contains("New high score!"));
    }
}
