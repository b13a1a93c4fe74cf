use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::games::SessionRng;
use crate::log;
use crate::scores::ScoreReporter;
use super::bot_controller::BotController;
use super::broadcaster::{GameBroadcaster, GameOverSummary, GameSnapshot};
use super::game_state::{SnakeGameState, StepOutcome};
use super::input::direction_from_key;
use super::settings::SnakeSessionSettings;
use super::types::{Direction, GameEndReason, GamePhase};

/// Everything the ticker and the input side both touch; one lock serializes
/// every mutation.
struct SessionCore {
    state: SnakeGameState,
    rng: SessionRng,
    started: bool,
    run_id: u64,
    autopilot: bool,
}

impl SessionCore {
    fn phase(&self) -> GamePhase {
        if !self.started {
            GamePhase::Idle
        } else if self.state.is_terminal() {
            GamePhase::GameOver
        } else if self.state.is_active() {
            GamePhase::Playing
        } else {
            GamePhase::Paused
        }
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state, self.phase())
    }

    fn tick(&mut self) -> StepOutcome {
        if self.autopilot
            && let Some(direction) = BotController::calculate_move(&self.state, &mut self.rng)
        {
            self.state.request_direction(direction);
        }
        self.state.step(&mut self.rng)
    }
}

/// Lifecycle controller: `Idle -> Playing <-> Paused -> GameOver`, with
/// `reset` starting a fresh run from any phase.
///
/// The tick source is a task that only exists while a run is playing. It is
/// aborted on pause, reset, shutdown and drop.
pub struct GameController<B: GameBroadcaster, R: ScoreReporter> {
    core: Arc<Mutex<SessionCore>>,
    settings: SnakeSessionSettings,
    broadcaster: B,
    reporter: R,
    ticker: Option<JoinHandle<()>>,
}

impl<B: GameBroadcaster, R: ScoreReporter> GameController<B, R> {
    pub fn new(settings: SnakeSessionSettings, broadcaster: B, reporter: R) -> Self {
        let rng = settings
            .seed
            .map(SessionRng::new)
            .unwrap_or_else(SessionRng::from_random);
        log!("Game controller created with seed {}", rng.seed());

        let mut state = SnakeGameState::new(&settings);
        state.set_active(false);

        let core = SessionCore {
            state,
            rng,
            started: false,
            run_id: 0,
            autopilot: settings.autopilot,
        };

        Self {
            core: Arc::new(Mutex::new(core)),
            settings,
            broadcaster,
            reporter,
            ticker: None,
        }
    }

    /// Begins a run from Idle or GameOver.
    pub async fn start(&mut self) -> Result<(), String> {
        let core = Arc::clone(&self.core);
        let mut core = core.lock().await;
        match core.phase() {
            GamePhase::Idle | GamePhase::GameOver => {}
            phase => return Err(format!("Cannot start a game while {:?}", phase)),
        }
        let snapshot = self.begin_run(&mut core);
        drop(core);

        self.broadcaster.broadcast_state(snapshot).await;
        Ok(())
    }

    /// Throws the current run away and starts a fresh one.
    pub async fn reset(&mut self) {
        let core = Arc::clone(&self.core);
        let mut core = core.lock().await;
        let snapshot = self.begin_run(&mut core);
        drop(core);

        self.broadcaster.broadcast_state(snapshot).await;
    }

    pub async fn pause(&mut self) -> Result<(), String> {
        let core = Arc::clone(&self.core);
        let mut core = core.lock().await;
        if core.phase() != GamePhase::Playing {
            return Err(format!("Cannot pause while {:?}", core.phase()));
        }
        self.stop_ticker();
        core.state.set_active(false);
        log!("Run {} paused at score {}", core.run_id, core.state.score());
        let snapshot = core.snapshot();
        drop(core);

        self.broadcaster.broadcast_state(snapshot).await;
        Ok(())
    }

    pub async fn resume(&mut self) -> Result<(), String> {
        let core = Arc::clone(&self.core);
        let mut core = core.lock().await;
        if core.phase() != GamePhase::Paused {
            return Err(format!("Cannot resume while {:?}", core.phase()));
        }
        core.state.set_active(true);
        self.spawn_ticker(core.run_id);
        log!("Run {} resumed", core.run_id);
        let snapshot = core.snapshot();
        drop(core);

        self.broadcaster.broadcast_state(snapshot).await;
        Ok(())
    }

    pub async fn toggle_pause(&mut self) -> Result<(), String> {
        match self.phase().await {
            GamePhase::Playing => self.pause().await,
            GamePhase::Paused => self.resume().await,
            phase => Err(format!("Nothing to pause while {:?}", phase)),
        }
    }

    /// Returns whether the direction changed; requests outside a live run
    /// and same-axis requests are dropped.
    pub async fn change_direction(&self, direction: Direction) -> bool {
        self.core.lock().await.state.request_direction(direction)
    }

    /// Like `change_direction` for raw key names; unknown keys are ignored.
    pub async fn handle_key(&self, key: &str) -> bool {
        match direction_from_key(key) {
            Some(direction) => self.change_direction(direction).await,
            None => false,
        }
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.core.lock().await.snapshot()
    }

    pub async fn phase(&self) -> GamePhase {
        self.core.lock().await.phase()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|ticker| !ticker.is_finished())
    }

    /// Stops the tick source for good. The state stays readable.
    pub fn shutdown(&mut self) {
        if self.ticker.is_some() {
            log!("Shutting down game controller");
        }
        self.stop_ticker();
    }

    fn begin_run(&mut self, core: &mut SessionCore) -> GameSnapshot {
        self.stop_ticker();
        core.run_id += 1;
        core.state = SnakeGameState::new(&self.settings);
        core.started = true;
        log!("Run {} started", core.run_id);
        self.spawn_ticker(core.run_id);
        core.snapshot()
    }

    fn spawn_ticker(&mut self, run_id: u64) {
        self.stop_ticker();
        let task = run_ticker(
            Arc::clone(&self.core),
            run_id,
            self.settings.tick_interval,
            self.broadcaster.clone(),
            self.reporter.clone(),
        );
        self.ticker = Some(tokio::spawn(task));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl<B: GameBroadcaster, R: ScoreReporter> Drop for GameController<B, R> {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

async fn run_ticker<B: GameBroadcaster, R: ScoreReporter>(
    core: Arc<Mutex<SessionCore>>,
    run_id: u64,
    tick_interval: Duration,
    broadcaster: B,
    reporter: R,
) {
    let mut timer = interval_at(Instant::now() + tick_interval, tick_interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        timer.tick().await;

        let (outcome, snapshot) = {
            let mut core = core.lock().await;
            // A stale ticker from an earlier run must not touch the new one.
            if core.run_id != run_id {
                return;
            }
            let outcome = core.tick();
            (outcome, core.snapshot())
        };

        match outcome {
            StepOutcome::Skipped => return,
            StepOutcome::Ended(reason) => {
                // Detach the report before the next await: a reset may abort
                // this task while the terminal snapshot is being drawn.
                tokio::spawn(report_game_over(
                    run_id,
                    snapshot.score,
                    reason,
                    broadcaster.clone(),
                    reporter,
                ));
                broadcaster.broadcast_state(snapshot).await;
                return;
            }
            StepOutcome::Moved | StepOutcome::AteFood { .. } => {
                broadcaster.broadcast_state(snapshot).await;
            }
        }
    }
}

/// Runs detached from the ticker so a slow or failing store never holds up
/// the next run.
async fn report_game_over<B: GameBroadcaster, R: ScoreReporter>(
    run_id: u64,
    final_score: u32,
    reason: GameEndReason,
    broadcaster: B,
    reporter: R,
) {
    let high_score = reporter.report_score(final_score).await;
    match &high_score {
        Ok(report) if report.is_new_high_score => {
            log!("Run {} set a new high score: {}", run_id, report.stored_high_score)
        }
        Ok(report) => log!(
            "Run {} finished with {} (high score {})",
            run_id,
            final_score,
            report.stored_high_score
        ),
        Err(e) => log!("Run {} failed to record score {}: {}", run_id, final_score, e),
    }

    broadcaster
        .broadcast_game_over(GameOverSummary {
            final_score,
            reason,
            high_score,
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::mpsc;
    use crate::games::snake::settings::{INITIAL_FOOD, INITIAL_SNAKE};
    use crate::games::snake::Point;
    use crate::scores::ScoreReport;

    #[derive(Clone)]
    struct RecordingBroadcaster {
        states: Arc<StdMutex<Vec<GameSnapshot>>>,
        game_over_tx: mpsc::UnboundedSender<GameOverSummary>,
    }

    impl GameBroadcaster for RecordingBroadcaster {
        async fn broadcast_state(&self, snapshot: GameSnapshot) {
            self.states.lock().unwrap().push(snapshot);
        }

        async fn broadcast_game_over(&self, summary: GameOverSummary) {
            let _ = self.game_over_tx.send(summary);
        }
    }

    #[derive(Clone, Default)]
    struct RecordingReporter {
        reported: Arc<StdMutex<Vec<u32>>>,
        fail: bool,
    }

    impl ScoreReporter for RecordingReporter {
        async fn report_score(&self, final_score: u32) -> Result<ScoreReport, String> {
            self.reported.lock().unwrap().push(final_score);
            if self.fail {
                return Err("disk full".to_string());
            }
            Ok(ScoreReport {
                is_new_high_score: final_score > 0,
                stored_high_score: final_score,
            })
        }
    }

    struct Harness {
        controller: GameController<RecordingBroadcaster, RecordingReporter>,
        states: Arc<StdMutex<Vec<GameSnapshot>>>,
        game_over_rx: mpsc::UnboundedReceiver<GameOverSummary>,
        reported: Arc<StdMutex<Vec<u32>>>,
    }

    fn create_harness(settings: SnakeSessionSettings, reporter: RecordingReporter) -> Harness {
        let states = Arc::new(StdMutex::new(Vec::new()));
        let (game_over_tx, game_over_rx) = mpsc::unbounded_channel();
        let broadcaster = RecordingBroadcaster {
            states: Arc::clone(&states),
            game_over_tx,
        };
        let reported = Arc::clone(&reporter.reported);
        Harness {
            controller: GameController::new(settings, broadcaster, reporter),
            states,
            game_over_rx,
            reported,
        }
    }

    fn seeded_settings() -> SnakeSessionSettings {
        SnakeSessionSettings {
            seed: Some(42),
            ..SnakeSessionSettings::default()
        }
    }

    fn default_harness() -> Harness {
        create_harness(seeded_settings(), RecordingReporter::default())
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_idle_and_ignores_input() {
        let mut h = default_harness();

        assert_eq!(h.controller.phase().await, GamePhase::Idle);
        assert!(!h.controller.change_direction(Direction::Left).await);
        assert!(h.controller.pause().await.is_err());
        assert!(h.controller.resume().await.is_err());
        assert!(!h.controller.is_ticking());

        advance(1000).await;
        assert!(h.states.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_moves_one_cell_per_tick() {
        let mut h = default_harness();
        h.controller.start().await.unwrap();
        assert_eq!(h.controller.phase().await, GamePhase::Playing);
        assert!(h.controller.is_ticking());

        advance(150 * 3 + 75).await;

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.head(), Some(Point::new(10, 7)));
        assert_eq!(snapshot.snake.len(), 5);
        assert!(h.controller.start().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks_and_resume_restarts() {
        let mut h = default_harness();
        h.controller.start().await.unwrap();
        advance(375).await;

        h.controller.pause().await.unwrap();
        assert_eq!(h.controller.phase().await, GamePhase::Paused);
        assert!(!h.controller.is_ticking());
        assert!(!h.controller.change_direction(Direction::Left).await);

        advance(3000).await;
        assert_eq!(h.controller.snapshot().await.head(), Some(Point::new(10, 8)));

        h.controller.toggle_pause().await.unwrap();
        assert_eq!(h.controller.phase().await, GamePhase::Playing);
        assert!(h.controller.is_ticking());

        advance(225).await;
        assert_eq!(h.controller.snapshot().await.head(), Some(Point::new(10, 7)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_direction_change_applies_on_next_tick() {
        let mut h = default_harness();
        h.controller.start().await.unwrap();

        assert!(h.controller.change_direction(Direction::Left).await);
        assert!(!h.controller.change_direction(Direction::Right).await);
        assert!(!h.controller.handle_key("Escape").await);

        advance(225).await;
        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.head(), Some(Point::new(9, 10)));
        assert_eq!(snapshot.direction, Direction::Left);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_reports_once() {
        let mut h = default_harness();
        h.controller.start().await.unwrap();

        let summary = h.game_over_rx.recv().await.unwrap();
        assert_eq!(summary.final_score, 0);
        assert_eq!(summary.reason, GameEndReason::WallCollision);
        assert!(summary.high_score.is_ok());

        assert_eq!(h.controller.phase().await, GamePhase::GameOver);
        let snapshot = h.controller.snapshot().await;
        assert!(snapshot.terminal);
        assert!(!snapshot.active);
        assert_eq!(snapshot.head(), Some(Point::new(10, 0)));
        assert!(!h.controller.is_ticking());
        assert!(!h.controller.change_direction(Direction::Left).await);

        advance(3000).await;
        assert!(h.game_over_rx.try_recv().is_err());
        assert_eq!(*h.reported.lock().unwrap(), vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_after_game_over_restores_initial_layout() {
        let mut h = default_harness();
        h.controller.start().await.unwrap();
        h.game_over_rx.recv().await.unwrap();

        h.controller.reset().await;

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.snake, INITIAL_SNAKE.to_vec());
        assert_eq!(snapshot.food, INITIAL_FOOD);
        assert_eq!(snapshot.direction, Direction::Up);
        assert_eq!(snapshot.score, 0);
        assert!(!snapshot.terminal);
        assert!(snapshot.active);
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert!(h.controller.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_while_playing_discards_the_run() {
        let mut h = default_harness();
        h.controller.start().await.unwrap();
        advance(375).await;
        h.controller.change_direction(Direction::Left).await;

        h.controller.reset().await;
        assert_eq!(h.controller.snapshot().await.snake, INITIAL_SNAKE.to_vec());

        advance(160).await;
        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.head(), Some(Point::new(10, 9)));
        assert_eq!(snapshot.direction, Direction::Up);
        assert!(h.reported.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reporter_failure_does_not_block_new_run() {
        let reporter = RecordingReporter {
            fail: true,
            ..RecordingReporter::default()
        };
        let mut h = create_harness(seeded_settings(), reporter);
        h.controller.start().await.unwrap();

        let summary = h.game_over_rx.recv().await.unwrap();
        assert_eq!(summary.high_score, Err("disk full".to_string()));

        h.controller.start().await.unwrap();
        assert_eq!(h.controller.phase().await, GamePhase::Playing);
        assert_eq!(h.controller.snapshot().await.score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticker() {
        let mut h = default_harness();
        h.controller.start().await.unwrap();
        advance(160).await;

        h.controller.shutdown();
        assert!(!h.controller.is_ticking());
        let recorded = h.states.lock().unwrap().len();

        advance(2000).await;
        assert_eq!(h.states.lock().unwrap().len(), recorded);
        assert_eq!(h.controller.snapshot().await.head(), Some(Point::new(10, 9)));
    }

    #[derive(Clone)]
    struct SlowGameOverBroadcaster {
        inner: RecordingBroadcaster,
    }

    impl GameBroadcaster for SlowGameOverBroadcaster {
        async fn broadcast_state(&self, snapshot: GameSnapshot) {
            if snapshot.terminal {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            self.inner.broadcast_state(snapshot).await;
        }

        async fn broadcast_game_over(&self, summary: GameOverSummary) {
            self.inner.broadcast_game_over(summary).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_slow_game_over_draw_still_reports() {
        let states = Arc::new(StdMutex::new(Vec::new()));
        let (game_over_tx, mut game_over_rx) = mpsc::unbounded_channel();
        let broadcaster = SlowGameOverBroadcaster {
            inner: RecordingBroadcaster {
                states: Arc::clone(&states),
                game_over_tx,
            },
        };
        let reporter = RecordingReporter::default();
        let reported = Arc::clone(&reporter.reported);
        let mut controller = GameController::new(seeded_settings(), broadcaster, reporter);
        controller.start().await.unwrap();

        while controller.phase().await != GamePhase::GameOver {
            advance(10).await;
        }
        controller.start().await.unwrap();
        advance(500).await;

        assert_eq!(*reported.lock().unwrap(), vec![0]);
        let summary = game_over_rx.try_recv().unwrap();
        assert_eq!(summary.reason, GameEndReason::WallCollision);
        assert_eq!(controller.phase().await, GamePhase::Playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticker() {
        let mut h = default_harness();
        h.controller.start().await.unwrap();
        let states = Arc::clone(&h.states);

        drop(h.controller);
        advance(2000).await;

        assert_eq!(states.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autopilot_finds_food() {
        let settings = SnakeSessionSettings {
            autopilot: true,
            ..seeded_settings()
        };
        let mut h = create_harness(settings, RecordingReporter::default());
        h.controller.start().await.unwrap();

        advance(150 * 40).await;

        let best = h
            .states
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.score)
            .max()
            .unwrap_or(0);
        assert!(best >= 10);
    }
}
