use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::{Submission, SubmissionAsset};
use crate::db::types::{AssetKind, QuestionKind, SubmissionStatus};
use crate::schemas::assignment::SubmissionSummary;
use crate::services::grading::Verdict;

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionAssetResponse {
    pub(crate) id: String,
    pub(crate) kind: AssetKind,
    pub(crate) url: String,
    pub(crate) content_type: String,
    pub(crate) file_size: i64,
    pub(crate) duration_sec: Option<i32>,
    pub(crate) uploaded_at: String,
}

impl SubmissionAssetResponse {
    pub(crate) fn from_db(asset: &SubmissionAsset) -> Self {
        Self {
            id: asset.id.clone(),
            kind: asset.kind,
            url: asset.url.clone(),
            content_type: asset.content_type.clone(),
            file_size: asset.file_size,
            duration_sec: asset.duration_sec,
            uploaded_at: format_primitive(asset.uploaded_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) assignment_id: String,
    pub(crate) learner_id: String,
    pub(crate) status: SubmissionStatus,
    pub(crate) score: f64,
    pub(crate) content: Option<String>,
    pub(crate) audio_url: Option<String>,
    pub(crate) audio_duration_sec: Option<i32>,
    pub(crate) submitted_at: String,
    pub(crate) assets: Vec<SubmissionAssetResponse>,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: Submission, assets: &[SubmissionAsset]) -> Self {
        Self {
            id: submission.id,
            assignment_id: submission.assignment_id,
            learner_id: submission.learner_id,
            status: submission.status,
            score: submission.score,
            content: submission.content,
            audio_url: submission.audio_url,
            audio_duration_sec: submission.audio_duration_sec,
            submitted_at: format_primitive(submission.submitted_at),
            assets: assets.iter().map(SubmissionAssetResponse::from_db).collect(),
        }
    }
}

/// Per-question line of the results view. Canonical answers are present only
/// when the assignment's show-answers policy allows them.
#[derive(Debug, Serialize)]
pub(crate) struct QuestionResultResponse {
    pub(crate) id: String,
    pub(crate) content: String,
    pub(crate) kind: QuestionKind,
    pub(crate) points: f64,
    pub(crate) position: i32,
    pub(crate) your_answer: Option<String>,
    pub(crate) verdict: Option<Verdict>,
    pub(crate) correct_answer: Option<String>,
    pub(crate) correct_option_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultsResponse {
    pub(crate) assignment_id: String,
    pub(crate) submission: SubmissionSummary,
    pub(crate) answers_visible: bool,
    pub(crate) questions: Vec<QuestionResultResponse>,
}
