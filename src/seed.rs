use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{
    AccountRole, AssignmentKind, AssignmentStatus, EnrollmentStatus, QuestionKind,
    ShowAnswersPolicy,
};
use crate::repositories;

const DEMO_INSTRUCTOR_EMAIL: &str = "instructor@demo.aula.local";
const DEMO_LEARNER_EMAIL: &str = "learner@demo.aula.local";
const DEMO_PASSWORD: &str = "demo-password";

/// Seed a demo course with one active quiz so a fresh deployment can be
/// driven end to end. Safe to run repeatedly.
pub(crate) async fn run(state: &AppState) -> anyhow::Result<()> {
    if repositories::accounts::find_by_email(state.db(), DEMO_INSTRUCTOR_EMAIL).await?.is_some() {
        tracing::info!("Demo data already present; skipping seed");
        return Ok(());
    }

    let now = primitive_now_utc();

    let instructor_account = repositories::accounts::create(
        state.db(),
        repositories::accounts::CreateAccount {
            id: &Uuid::new_v4().to_string(),
            email: DEMO_INSTRUCTOR_EMAIL,
            hashed_password: security::hash_password(DEMO_PASSWORD)?,
            role: AccountRole::Instructor,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    let instructor = repositories::instructors::create(
        state.db(),
        repositories::instructors::CreateInstructor {
            id: &Uuid::new_v4().to_string(),
            account_id: &instructor_account.id,
            full_name: "Demo Instructor",
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    let learner_account = repositories::accounts::create(
        state.db(),
        repositories::accounts::CreateAccount {
            id: &Uuid::new_v4().to_string(),
            email: DEMO_LEARNER_EMAIL,
            hashed_password: security::hash_password(DEMO_PASSWORD)?,
            role: AccountRole::Learner,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    let learner = repositories::learners::create(
        state.db(),
        repositories::learners::CreateLearner {
            id: &Uuid::new_v4().to_string(),
            account_id: &learner_account.id,
            full_name: "Demo Learner",
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            title: "Introduction to Geography",
            instructor_id: &instructor.id,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    repositories::enrollments::create(
        state.db(),
        repositories::enrollments::CreateEnrollment {
            id: &Uuid::new_v4().to_string(),
            course_id: &course.id,
            learner_id: &learner.id,
            status: EnrollmentStatus::Active,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    let assignment = repositories::assignments::create(
        state.db(),
        repositories::assignments::CreateAssignment {
            id: &Uuid::new_v4().to_string(),
            course_id: &course.id,
            title: "Capitals quiz",
            description: Some("Warm-up quiz on European capitals"),
            kind: AssignmentKind::Quiz,
            status: AssignmentStatus::Active,
            deadline: None,
            show_answers: ShowAnswersPolicy::AfterSubmission,
            created_by: &instructor.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    seed_question(
        state,
        &assignment.id,
        0,
        "France is in Europe.",
        QuestionKind::TrueFalse,
        Some("true"),
        &[],
    )
    .await?;

    seed_question(
        state,
        &assignment.id,
        1,
        "Name the capital of France.",
        QuestionKind::FillInBlank,
        Some("Paris"),
        &[],
    )
    .await?;

    seed_question(
        state,
        &assignment.id,
        2,
        "Which of these is the capital of Italy?",
        QuestionKind::MultipleChoice,
        None,
        &[("Rome", true), ("Milan", false), ("Naples", false)],
    )
    .await?;

    seed_question(
        state,
        &assignment.id,
        3,
        "Match each country to its capital.",
        QuestionKind::Matching,
        Some(r#"[{"left":"Spain","right":"Madrid"},{"left":"Portugal","right":"Lisbon"}]"#),
        &[],
    )
    .await?;

    tracing::info!(
        course_id = %course.id,
        assignment_id = %assignment.id,
        "Seeded demo course and quiz"
    );

    Ok(())
}

async fn seed_question(
    state: &AppState,
    assignment_id: &str,
    position: i32,
    content: &str,
    kind: QuestionKind,
    canonical_answer: Option<&str>,
    options: &[(&str, bool)],
) -> anyhow::Result<()> {
    let now = primitive_now_utc();
    let question_id = Uuid::new_v4().to_string();

    repositories::questions::create(
        state.db(),
        repositories::questions::CreateQuestion {
            id: &question_id,
            content,
            kind,
            canonical_answer,
            points: 1.0,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    for (index, (content, is_correct)) in options.iter().enumerate() {
        repositories::questions::create_option(
            state.db(),
            &Uuid::new_v4().to_string(),
            &question_id,
            content,
            *is_correct,
            index as i32,
        )
        .await?;
    }

    repositories::questions::attach_to_assignment(
        state.db(),
        &Uuid::new_v4().to_string(),
        assignment_id,
        &question_id,
        position,
    )
    .await?;

    Ok(())
}
