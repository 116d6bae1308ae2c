//! Next-day content prediction from recent history.
//!
//! # Invariants
//! - At most `PREDICTION_HISTORY_LIMIT` records are embedded in the prompt.
//! - Empty history never reaches the generation service.
//! - Generation failures are logged and reported through `PredictionStatus`;
//!   they never propagate to the caller.

use crate::generation::{GenerationService, ServiceError};
use crate::model::content::DayContent;
use crate::model::daily_record::DailyRecord;
use crate::pipeline::prompt::{day_block, format_rules, output_template};
use crate::pipeline::resolver::resolve;
use crate::pipeline::sections::{extract, Extraction, DAILY_MARKERS};
use log::{info, warn};

/// Number of most-recent records considered for a prediction.
pub const PREDICTION_HISTORY_LIMIT: usize = 3;

/// How a prediction was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionStatus {
    /// No history; generation was not contacted.
    NoHistory,
    /// Reply carried both section markers.
    Predicted,
    /// Reply arrived but lacked well-formed markers.
    Unstructured,
    /// Generation call failed.
    ServiceFailed(ServiceError),
}

/// Predicted content plus how it was obtained.
///
/// `content` is empty for every status except `Predicted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub content: DayContent,
    pub status: PredictionStatus,
}

impl Prediction {
    fn empty(status: PredictionStatus) -> Self {
        Self {
            content: DayContent::default(),
            status,
        }
    }
}

/// Composes prediction prompts and interprets replies.
pub struct PredictionComposer<G: GenerationService> {
    generation: G,
}

impl<G: GenerationService> PredictionComposer<G> {
    pub fn new(generation: G) -> Self {
        Self { generation }
    }

    /// Predicts next-day content from `history`, most-recent first.
    ///
    /// Only the first `PREDICTION_HISTORY_LIMIT` records are used.
    pub fn predict_next(&self, history: &[DailyRecord]) -> Prediction {
        let window = &history[..history.len().min(PREDICTION_HISTORY_LIMIT)];
        if window.is_empty() {
            info!("event=predict_next module=pipeline status=skipped reason=no_history");
            return Prediction::empty(PredictionStatus::NoHistory);
        }

        let prompt = prediction_prompt(window);
        match self.generation.complete(&prompt) {
            Ok(reply) => match extract(&reply) {
                Extraction::Matched(content) => {
                    info!(
                        "event=predict_next module=pipeline status=ok history={}",
                        window.len()
                    );
                    Prediction {
                        content,
                        status: PredictionStatus::Predicted,
                    }
                }
                Extraction::Miss => {
                    warn!(
                        "event=predict_next module=pipeline status=degraded reason=extraction_miss reply_chars={}",
                        reply.chars().count()
                    );
                    Prediction::empty(PredictionStatus::Unstructured)
                }
            },
            Err(err) => {
                warn!(
                    "event=predict_next module=pipeline status=degraded error_code={} error={}",
                    err.code(),
                    err
                );
                Prediction::empty(PredictionStatus::ServiceFailed(err))
            }
        }
    }
}

/// Builds the prediction prompt for `history`, most-recent first.
pub fn prediction_prompt(history: &[DailyRecord]) -> String {
    let mut blocks = String::new();
    for record in history {
        blocks.push_str(&day_block(&record.date.to_string(), &resolve(record)));
        blocks.push('\n');
    }

    format!(
        "以下是最近{}天的日报内容（按日期从近到远排列）：\n\n{}\
         请根据这些日报推断下一个工作日的日报内容，输出成如下格式：\n{}\n\n{}",
        history.len(),
        blocks,
        output_template(DAILY_MARKERS),
        format_rules(DAILY_MARKERS)
    )
}
