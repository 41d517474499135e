use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::{Assignment, AssignmentQuestion, QuestionOption, Submission};
use crate::db::types::{AssignmentKind, AssignmentStatus, QuestionKind, ShowAnswersPolicy, SubmissionStatus};

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionSummary {
    pub(crate) id: String,
    pub(crate) status: SubmissionStatus,
    pub(crate) score: f64,
    pub(crate) submitted_at: String,
}

impl SubmissionSummary {
    pub(crate) fn from_db(submission: &Submission) -> Self {
        Self {
            id: submission.id.clone(),
            status: submission.status,
            score: submission.score,
            submitted_at: format_primitive(submission.submitted_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) kind: AssignmentKind,
    pub(crate) status: AssignmentStatus,
    pub(crate) deadline: Option<String>,
    pub(crate) show_answers: ShowAnswersPolicy,
    pub(crate) created_at: String,
    pub(crate) my_submission: Option<SubmissionSummary>,
}

impl AssignmentResponse {
    pub(crate) fn from_db(assignment: Assignment, my_submission: Option<&Submission>) -> Self {
        Self {
            id: assignment.id,
            course_id: assignment.course_id,
            title: assignment.title,
            description: assignment.description,
            kind: assignment.kind,
            status: assignment.status,
            deadline: assignment.deadline.map(format_primitive),
            show_answers: assignment.show_answers,
            created_at: format_primitive(assignment.created_at),
            my_submission: my_submission.map(SubmissionSummary::from_db),
        }
    }
}

/// Option as shown to a learner; the `is_correct` flag never leaves the
/// server through this type.
#[derive(Debug, Serialize)]
pub(crate) struct QuestionOptionResponse {
    pub(crate) id: String,
    pub(crate) content: String,
    pub(crate) position: i32,
}

impl QuestionOptionResponse {
    pub(crate) fn from_db(option: &QuestionOption) -> Self {
        Self { id: option.id.clone(), content: option.content.clone(), position: option.position }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentQuestionResponse {
    pub(crate) id: String,
    pub(crate) content: String,
    pub(crate) kind: QuestionKind,
    pub(crate) points: f64,
    pub(crate) position: i32,
    pub(crate) options: Vec<QuestionOptionResponse>,
}

impl AssignmentQuestionResponse {
    pub(crate) fn from_db(
        question: &AssignmentQuestion,
        options: &[QuestionOption],
    ) -> Self {
        Self {
            id: question.assignment_question_id.clone(),
            content: question.content.clone(),
            kind: question.kind,
            points: question.points,
            position: question.position,
            options: options.iter().map(QuestionOptionResponse::from_db).collect(),
        }
    }
}
