use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::db::models::{AssignmentQuestion, QuestionOption};
use crate::db::types::QuestionKind;

/// Outcome of automatic answer evaluation. Essay and speaking answers are
/// never auto-graded and stay `PendingReview` until an instructor scores
/// them by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Verdict {
    Correct,
    Incorrect,
    PendingReview,
}

/// One left/right pair of a matching question, both in the canonical answer
/// stored on the question and in the learner's submitted blob.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub(crate) struct MatchPair {
    pub(crate) left: String,
    pub(crate) right: String,
}

pub(crate) fn parse_match_pairs(raw: &str) -> Result<Vec<MatchPair>, serde_json::Error> {
    serde_json::from_str::<Vec<MatchPair>>(raw)
}

/// Questions of one assignment keyed by their assignment-scoped ordinal id,
/// with options grouped per question.
pub(crate) struct QuestionSet {
    questions: HashMap<String, AssignmentQuestion>,
    options: HashMap<String, Vec<QuestionOption>>,
}

impl QuestionSet {
    pub(crate) fn new(questions: Vec<AssignmentQuestion>, options: Vec<QuestionOption>) -> Self {
        let mut grouped: HashMap<String, Vec<QuestionOption>> = HashMap::new();
        for option in options {
            grouped.entry(option.question_id.clone()).or_default().push(option);
        }

        let questions = questions
            .into_iter()
            .map(|question| (question.assignment_question_id.clone(), question))
            .collect();

        Self { questions, options: grouped }
    }

    pub(crate) fn get(&self, ordinal_id: &str) -> Option<&AssignmentQuestion> {
        self.questions.get(ordinal_id)
    }

    pub(crate) fn options_for(&self, question: &AssignmentQuestion) -> &[QuestionOption] {
        self.options.get(&question.question_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Evaluate one submitted answer against its question. Pure; malformed
/// canonical data degrades to `Incorrect`, never an error.
pub(crate) fn evaluate(
    question: &AssignmentQuestion,
    options: &[QuestionOption],
    raw_answer: &str,
) -> Verdict {
    match question.kind {
        QuestionKind::Essay | QuestionKind::Speaking => Verdict::PendingReview,
        QuestionKind::MultipleChoice => evaluate_multiple_choice(options, raw_answer),
        QuestionKind::TrueFalse | QuestionKind::FillInBlank => {
            evaluate_text_equality(question.canonical_answer.as_deref(), raw_answer)
        }
        QuestionKind::Matching => {
            evaluate_matching(question.canonical_answer.as_deref(), raw_answer)
        }
    }
}

fn evaluate_multiple_choice(options: &[QuestionOption], raw_answer: &str) -> Verdict {
    let answer = raw_answer.trim();
    if answer.is_empty() {
        return Verdict::Incorrect;
    }

    // A question with zero or several flagged options is misconfigured;
    // nothing the learner sends can be correct.
    let mut flagged = options.iter().filter(|option| option.is_correct);
    let correct = match (flagged.next(), flagged.next()) {
        (Some(option), None) => option,
        _ => return Verdict::Incorrect,
    };

    if answer == correct.id {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

fn evaluate_text_equality(canonical: Option<&str>, raw_answer: &str) -> Verdict {
    let answer = raw_answer.trim();
    if answer.is_empty() {
        return Verdict::Incorrect;
    }

    let Some(canonical) = canonical else {
        return Verdict::Incorrect;
    };

    if answer.to_lowercase() == canonical.trim().to_lowercase() {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

fn evaluate_matching(canonical: Option<&str>, raw_answer: &str) -> Verdict {
    if raw_answer.trim().is_empty() {
        return Verdict::Incorrect;
    }

    let Some(canonical) = canonical else {
        return Verdict::Incorrect;
    };

    let Ok(expected) = parse_match_pairs(canonical) else {
        tracing::warn!("Matching question carries malformed canonical answer");
        return Verdict::Incorrect;
    };
    let Ok(submitted) = parse_match_pairs(raw_answer) else {
        return Verdict::Incorrect;
    };

    // Pair order is irrelevant on both sides; compare as sets.
    let expected: BTreeSet<MatchPair> = expected.into_iter().collect();
    let submitted: BTreeSet<MatchPair> = submitted.into_iter().collect();

    if !expected.is_empty() && expected == submitted {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

fn question_points(question: &AssignmentQuestion) -> f64 {
    if question.points > 0.0 {
        question.points
    } else {
        1.0
    }
}

/// Total a submission's answers into a 0-100 percentage.
///
/// Only evaluable questions feed the accumulators: a pending essay or
/// speaking answer adds to neither side until graded by hand. Answers
/// referencing an ordinal outside this assignment are skipped.
pub(crate) fn aggregate_score(set: &QuestionSet, answers: &[(String, String)]) -> f64 {
    let mut earned = 0.0;
    let mut possible = 0.0;

    for (ordinal_id, answer) in answers {
        let Some(question) = set.get(ordinal_id) else {
            continue;
        };

        match evaluate(question, set.options_for(question), answer) {
            Verdict::Correct => {
                earned += question_points(question);
                possible += question_points(question);
            }
            Verdict::Incorrect => {
                possible += question_points(question);
            }
            Verdict::PendingReview => {}
        }
    }

    if possible == 0.0 {
        return 0.0;
    }

    round2(earned / possible * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{option_row, question_row};
    use crate::db::types::QuestionKind;

    fn set_of(
        questions: Vec<AssignmentQuestion>,
        options: Vec<QuestionOption>,
    ) -> QuestionSet {
        QuestionSet::new(questions, options)
    }

    #[test]
    fn multiple_choice_matches_single_flagged_option() {
        let question = question_row("aq-1", "q-1", QuestionKind::MultipleChoice, None, 1.0);
        let options = vec![
            option_row("opt-1", "q-1", "Paris", true),
            option_row("opt-2", "q-1", "Rome", false),
        ];

        assert_eq!(evaluate(&question, &options, "opt-1"), Verdict::Correct);
        assert_eq!(evaluate(&question, &options, "opt-2"), Verdict::Incorrect);
        assert_eq!(evaluate(&question, &options, ""), Verdict::Incorrect);
    }

    #[test]
    fn multiple_choice_without_single_flagged_option_never_correct() {
        let question = question_row("aq-1", "q-1", QuestionKind::MultipleChoice, None, 1.0);

        let none_flagged = vec![
            option_row("opt-1", "q-1", "Paris", false),
            option_row("opt-2", "q-1", "Rome", false),
        ];
        assert_eq!(evaluate(&question, &none_flagged, "opt-1"), Verdict::Incorrect);

        let both_flagged = vec![
            option_row("opt-1", "q-1", "Paris", true),
            option_row("opt-2", "q-1", "Rome", true),
        ];
        assert_eq!(evaluate(&question, &both_flagged, "opt-1"), Verdict::Incorrect);
        assert_eq!(evaluate(&question, &both_flagged, "opt-2"), Verdict::Incorrect);
    }

    #[test]
    fn true_false_is_case_insensitive() {
        let question =
            question_row("aq-1", "q-1", QuestionKind::TrueFalse, Some("true"), 1.0);

        assert_eq!(evaluate(&question, &[], "TRUE"), Verdict::Correct);
        assert_eq!(evaluate(&question, &[], " True "), Verdict::Correct);
        assert_eq!(evaluate(&question, &[], "false"), Verdict::Incorrect);
    }

    #[test]
    fn fill_in_blank_trims_and_ignores_case() {
        let question =
            question_row("aq-1", "q-1", QuestionKind::FillInBlank, Some("Paris"), 1.0);

        assert_eq!(evaluate(&question, &[], "  paris "), Verdict::Correct);
        assert_eq!(evaluate(&question, &[], "London"), Verdict::Incorrect);
        assert_eq!(evaluate(&question, &[], "   "), Verdict::Incorrect);
    }

    #[test]
    fn matching_compares_pairs_as_sets() {
        let canonical = r#"[{"left":"cat","right":"meow"},{"left":"dog","right":"woof"}]"#;
        let question =
            question_row("aq-1", "q-1", QuestionKind::Matching, Some(canonical), 1.0);

        let reordered = r#"[{"left":"dog","right":"woof"},{"left":"cat","right":"meow"}]"#;
        assert_eq!(evaluate(&question, &[], reordered), Verdict::Correct);

        let wrong = r#"[{"left":"cat","right":"woof"},{"left":"dog","right":"meow"}]"#;
        assert_eq!(evaluate(&question, &[], wrong), Verdict::Incorrect);
    }

    #[test]
    fn matching_rejects_malformed_json() {
        let canonical = r#"[{"left":"cat","right":"meow"}]"#;
        let question =
            question_row("aq-1", "q-1", QuestionKind::Matching, Some(canonical), 1.0);

        assert_eq!(evaluate(&question, &[], "{not json"), Verdict::Incorrect);
        assert_eq!(evaluate(&question, &[], r#"{"left":"cat"}"#), Verdict::Incorrect);

        let broken_canonical =
            question_row("aq-1", "q-1", QuestionKind::Matching, Some("oops"), 1.0);
        assert_eq!(evaluate(&broken_canonical, &[], canonical), Verdict::Incorrect);
    }

    #[test]
    fn essay_and_speaking_stay_pending() {
        let essay = question_row("aq-1", "q-1", QuestionKind::Essay, None, 5.0);
        let speaking = question_row("aq-2", "q-2", QuestionKind::Speaking, None, 5.0);

        assert_eq!(evaluate(&essay, &[], "my long answer"), Verdict::PendingReview);
        assert_eq!(evaluate(&speaking, &[], ""), Verdict::PendingReview);
    }

    #[test]
    fn aggregate_returns_zero_without_evaluable_points() {
        let set = set_of(vec![], vec![]);
        assert_eq!(aggregate_score(&set, &[]), 0.0);

        let essay_only = set_of(
            vec![question_row("aq-1", "q-1", QuestionKind::Essay, None, 5.0)],
            vec![],
        );
        let answers = vec![("aq-1".to_string(), "essay text".to_string())];
        assert_eq!(aggregate_score(&essay_only, &answers), 0.0);
    }

    #[test]
    fn aggregate_full_marks_when_all_correct() {
        let set = set_of(
            vec![
                question_row("aq-1", "q-1", QuestionKind::TrueFalse, Some("true"), 1.0),
                question_row("aq-2", "q-2", QuestionKind::FillInBlank, Some("Paris"), 1.0),
            ],
            vec![],
        );
        let answers = vec![
            ("aq-1".to_string(), "true".to_string()),
            ("aq-2".to_string(), "Paris".to_string()),
        ];

        assert_eq!(aggregate_score(&set, &answers), 100.0);
    }

    #[test]
    fn aggregate_weights_by_points_and_rounds() {
        let set = set_of(
            vec![
                question_row("aq-1", "q-1", QuestionKind::TrueFalse, Some("true"), 2.0),
                question_row("aq-2", "q-2", QuestionKind::FillInBlank, Some("Paris"), 1.0),
                question_row("aq-3", "q-3", QuestionKind::FillInBlank, Some("Rome"), 0.0),
            ],
            vec![],
        );
        let answers = vec![
            ("aq-1".to_string(), "true".to_string()),
            ("aq-2".to_string(), "London".to_string()),
            ("aq-3".to_string(), "Rome".to_string()),
        ];

        // 2 + 1 (defaulted) of 4 possible points.
        assert_eq!(aggregate_score(&set, &answers), 75.0);
    }

    #[test]
    fn aggregate_skips_unknown_ordinals() {
        let set = set_of(
            vec![question_row("aq-1", "q-1", QuestionKind::TrueFalse, Some("true"), 1.0)],
            vec![],
        );
        let answers = vec![
            ("aq-1".to_string(), "true".to_string()),
            ("aq-from-other-assignment".to_string(), "true".to_string()),
        ];

        assert_eq!(aggregate_score(&set, &answers), 100.0);
    }

    #[test]
    fn pending_answers_do_not_dilute_score() {
        let set = set_of(
            vec![
                question_row("aq-1", "q-1", QuestionKind::TrueFalse, Some("true"), 1.0),
                question_row("aq-2", "q-2", QuestionKind::Essay, None, 10.0),
            ],
            vec![],
        );
        let answers = vec![
            ("aq-1".to_string(), "true".to_string()),
            ("aq-2".to_string(), "a considered essay".to_string()),
        ];

        assert_eq!(aggregate_score(&set, &answers), 100.0);
    }
}
