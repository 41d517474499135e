use time::PrimitiveDateTime;

use crate::db::types::ShowAnswersPolicy;

/// Whether a learner who already submitted may see correct answers.
/// Consulted only once a submission exists; fails closed when the policy
/// needs a deadline the assignment does not carry.
pub(crate) fn can_show_answers(
    policy: ShowAnswersPolicy,
    deadline: Option<PrimitiveDateTime>,
    now: PrimitiveDateTime,
) -> bool {
    match policy {
        ShowAnswersPolicy::AfterSubmission => true,
        ShowAnswersPolicy::AfterDeadline => deadline.map(|deadline| now > deadline).unwrap_or(false),
        ShowAnswersPolicy::Never => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn after_submission_always_visible() {
        let now = datetime!(2024-01-05 12:00);
        assert!(can_show_answers(ShowAnswersPolicy::AfterSubmission, None, now));
        assert!(can_show_answers(
            ShowAnswersPolicy::AfterSubmission,
            Some(datetime!(2024-01-10 00:00)),
            now
        ));
    }

    #[test]
    fn after_deadline_flips_at_the_deadline() {
        let deadline = datetime!(2024-01-10 00:00);

        assert!(!can_show_answers(
            ShowAnswersPolicy::AfterDeadline,
            Some(deadline),
            datetime!(2024-01-09 23:59)
        ));
        assert!(!can_show_answers(ShowAnswersPolicy::AfterDeadline, Some(deadline), deadline));
        assert!(can_show_answers(
            ShowAnswersPolicy::AfterDeadline,
            Some(deadline),
            datetime!(2024-01-10 00:01)
        ));
    }

    #[test]
    fn after_deadline_without_deadline_fails_closed() {
        assert!(!can_show_answers(
            ShowAnswersPolicy::AfterDeadline,
            None,
            datetime!(2024-01-10 00:00)
        ));
    }

    #[test]
    fn never_stays_hidden() {
        assert!(!can_show_answers(
            ShowAnswersPolicy::Never,
            Some(datetime!(2024-01-10 00:00)),
            datetime!(2024-02-01 00:00)
        ));
    }
}
