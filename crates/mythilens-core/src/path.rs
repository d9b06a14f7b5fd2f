//! Progress through a guided heritage path.
//!
//! A path is an ordered list of steps, some carrying a quiz. Each finished
//! step earns [`ActionKind::StepCompletion`]; finishing the last one earns
//! [`ActionKind::PathCompletion`] and the path's completion badge instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::points::ActionKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub step: usize,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Reward owed to the user after a step is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReward {
    pub action: ActionKind,
    pub badge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathProgress {
    pub path_id: String,
    pub user_id: String,
    pub step_count: usize,
    pub current_step: usize,
    pub completed_steps: Vec<usize>,
    pub quiz_answers: Vec<QuizAnswer>,
    pub completed: bool,
    pub completion_badge: String,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PathProgress {
    pub fn new(
        path_id: impl Into<String>,
        user_id: impl Into<String>,
        step_count: usize,
        completion_badge: impl Into<String>,
    ) -> Result<Self, CoreError> {
        if step_count == 0 {
            return Err(CoreError::UnknownStep { step: 0, steps: 0 });
        }
        Ok(Self {
            path_id: path_id.into(),
            user_id: user_id.into(),
            step_count,
            current_step: 0,
            completed_steps: Vec::new(),
            quiz_answers: Vec::new(),
            completed: false,
            completion_badge: completion_badge.into(),
            completed_at: None,
        })
    }

    /// Record a quiz answer for the current step.
    ///
    /// Returns the action to award when the answer is correct. Wrong answers
    /// may be retried; once the step's quiz is answered correctly it is closed.
    pub fn answer_quiz(
        &mut self,
        correct: bool,
        at: DateTime<Utc>,
    ) -> Result<Option<ActionKind>, CoreError> {
        self.ensure_open("answer a quiz")?;
        if self.quiz_passed(self.current_step) {
            return Err(CoreError::InvalidTransition {
                from: format!("step {} quiz passed", self.current_step),
                action: "answer a quiz".into(),
            });
        }
        self.quiz_answers.push(QuizAnswer {
            step: self.current_step,
            correct,
            answered_at: at,
        });
        Ok(correct.then_some(ActionKind::QuizCorrect))
    }

    /// Finish the current step and move to the next one.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<StepReward, CoreError> {
        self.ensure_open("advance")?;
        self.completed_steps.push(self.current_step);
        self.current_step += 1;

        if self.current_step >= self.step_count {
            self.completed = true;
            self.completed_at = Some(at);
            return Ok(StepReward {
                action: ActionKind::PathCompletion,
                badge: Some(self.completion_badge.clone()),
            });
        }
        Ok(StepReward {
            action: ActionKind::StepCompletion,
            badge: None,
        })
    }

    pub fn correct_answers(&self) -> usize {
        self.quiz_answers.iter().filter(|a| a.correct).count()
    }

    pub fn quiz_passed(&self, step: usize) -> bool {
        self.quiz_answers.iter().any(|a| a.step == step && a.correct)
    }

    fn ensure_open(&self, action: &str) -> Result<(), CoreError> {
        if self.completed {
            return Err(CoreError::InvalidTransition {
                from: "completed".into(),
                action: action.into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_to_completion() {
        let now = Utc::now();
        let mut p = PathProgress::new("hampi-trail", "u", 3, "Vijayanagara Scholar").unwrap();

        assert_eq!(p.answer_quiz(false, now), Ok(None));
        assert_eq!(p.answer_quiz(true, now), Ok(Some(ActionKind::QuizCorrect)));
        assert_eq!(p.advance(now).unwrap().action, ActionKind::StepCompletion);
        assert_eq!(p.advance(now).unwrap().action, ActionKind::StepCompletion);

        let last = p.advance(now).unwrap();
        assert_eq!(last.action, ActionKind::PathCompletion);
        assert_eq!(last.badge.as_deref(), Some("Vijayanagara Scholar"));
        assert!(p.completed);
        assert_eq!(p.completed_steps, vec![0, 1, 2]);
        assert_eq!(p.correct_answers(), 1);
        assert_eq!(p.quiz_answers.len(), 2);
    }

    #[test]
    fn quiz_pays_once_per_step() {
        let now = Utc::now();
        let mut p = PathProgress::new("p", "u", 2, "b").unwrap();

        assert_eq!(p.answer_quiz(true, now), Ok(Some(ActionKind::QuizCorrect)));
        assert!(matches!(
            p.answer_quiz(true, now),
            Err(CoreError::InvalidTransition { .. })
        ));
        assert!(p.answer_quiz(false, now).is_err());
        assert_eq!(p.quiz_answers.len(), 1);

        p.advance(now).unwrap();
        assert!(!p.quiz_passed(1));
        assert_eq!(p.answer_quiz(true, now), Ok(Some(ActionKind::QuizCorrect)));
        assert_eq!(p.correct_answers(), 2);
    }

    #[test]
    fn completed_path_refuses_more_work() {
        let now = Utc::now();
        let mut p = PathProgress::new("p", "u", 1, "b").unwrap();
        p.advance(now).unwrap();
        assert!(p.advance(now).is_err());
        assert!(p.answer_quiz(true, now).is_err());
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(PathProgress::new("p", "u", 0, "b").is_err());
    }
}
