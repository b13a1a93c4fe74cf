mod high_score_store;

use std::future::Future;

pub use high_score_store::{HighScoreRecord, HighScoreStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreReport {
    pub is_new_high_score: bool,
    pub stored_high_score: u32,
}

/// Persistence hook called once per finished run.
pub trait ScoreReporter: Send + Sync + Clone + 'static {
    fn report_score(
        &self,
        final_score: u32,
    ) -> impl Future<Output = Result<ScoreReport, String>> + Send;
}
