use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{
    AccountRole, AssetKind, AssignmentKind, AssignmentStatus, EnrollmentStatus, QuestionKind,
    ShowAnswersPolicy, SubmissionStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Account {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) role: AccountRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Learner {
    pub(crate) id: String,
    pub(crate) account_id: String,
    pub(crate) full_name: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Instructor {
    pub(crate) id: String,
    pub(crate) account_id: String,
    pub(crate) full_name: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) instructor_id: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Enrollment {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) learner_id: String,
    pub(crate) status: EnrollmentStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assignment {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) kind: AssignmentKind,
    pub(crate) status: AssignmentStatus,
    pub(crate) deadline: Option<PrimitiveDateTime>,
    pub(crate) show_answers: ShowAnswersPolicy,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Question joined through `assignment_questions`, carrying the
/// per-assignment ordinal id the submission flow keys answers by.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AssignmentQuestion {
    pub(crate) assignment_question_id: String,
    pub(crate) question_id: String,
    pub(crate) content: String,
    pub(crate) kind: QuestionKind,
    pub(crate) canonical_answer: Option<String>,
    pub(crate) points: f64,
    pub(crate) position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuestionOption {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) content: String,
    pub(crate) is_correct: bool,
    pub(crate) position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: String,
    pub(crate) assignment_id: String,
    pub(crate) learner_id: String,
    pub(crate) status: SubmissionStatus,
    pub(crate) score: f64,
    pub(crate) content: Option<String>,
    pub(crate) audio_url: Option<String>,
    pub(crate) audio_duration_sec: Option<i32>,
    pub(crate) submitted_at: PrimitiveDateTime,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct SubmissionAnswer {
    pub(crate) id: String,
    pub(crate) learner_id: String,
    pub(crate) assignment_question_id: String,
    pub(crate) answer: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct SubmissionAsset {
    pub(crate) id: String,
    pub(crate) submission_id: String,
    pub(crate) kind: AssetKind,
    pub(crate) object_key: String,
    pub(crate) url: String,
    pub(crate) content_type: String,
    pub(crate) file_size: i64,
    pub(crate) duration_sec: Option<i32>,
    pub(crate) uploaded_at: PrimitiveDateTime,
}
