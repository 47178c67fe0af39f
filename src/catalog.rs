//! Read-only quiz catalog: lookup by id, home-page style filtering and
//! validation of quizzes coming from configuration.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument};

use crate::config::AppConfig;
use crate::domain::{Difficulty, Quiz, QuizId, QuestionId};
use crate::seeds::seed_quizzes;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("quiz {0} has no questions")]
    EmptyQuestions(QuizId),
    #[error("quiz {quiz} question {question} needs at least two options")]
    TooFewOptions { quiz: QuizId, question: QuestionId },
    #[error("quiz {quiz} question {question}: correct answer {index} is out of range")]
    CorrectAnswerOutOfRange { quiz: QuizId, question: QuestionId, index: usize },
    #[error("quiz {0} has a zero time limit")]
    ZeroTimeLimit(QuizId),
    #[error("quiz {quiz} repeats question id {question}")]
    DuplicateQuestionId { quiz: QuizId, question: QuestionId },
    #[error("quiz id {0} already exists in the catalog")]
    DuplicateQuizId(QuizId),
}

/// Check the structural invariants every playable quiz must satisfy.
pub fn validate_quiz(quiz: &Quiz) -> Result<(), CatalogError> {
    if quiz.questions.is_empty() {
        return Err(CatalogError::EmptyQuestions(quiz.id));
    }
    if quiz.time_per_question == 0 {
        return Err(CatalogError::ZeroTimeLimit(quiz.id));
    }
    let mut seen = HashSet::new();
    for q in &quiz.questions {
        if !seen.insert(q.id) {
            return Err(CatalogError::DuplicateQuestionId { quiz: quiz.id, question: q.id });
        }
        if q.options.len() < 2 {
            return Err(CatalogError::TooFewOptions { quiz: quiz.id, question: q.id });
        }
        if q.correct_answer >= q.options.len() {
            return Err(CatalogError::CorrectAnswerOutOfRange {
                quiz: quiz.id,
                question: q.id,
                index: q.correct_answer,
            });
        }
    }
    Ok(())
}

/// Optional filters; `None` or empty strings match everything.
#[derive(Clone, Debug, Default)]
pub struct QuizFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuizFilter {
    fn matches(&self, quiz: &Quiz) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                quiz.title.to_lowercase().contains(&needle)
                    || quiz.description.to_lowercase().contains(&needle)
            }
        };
        let category_ok = match self.category.as_deref() {
            None | Some("") => true,
            Some(c) => quiz.category == c,
        };
        let difficulty_ok = self.difficulty.map_or(true, |d| quiz.difficulty == d);
        search_ok && category_ok && difficulty_ok
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    quizzes: Vec<Arc<Quiz>>,
}

impl Catalog {
    /// Built-in seeds plus any valid config quizzes. Invalid entries are skipped.
    #[instrument(level = "info", skip_all)]
    pub fn from_config(cfg: Option<&AppConfig>) -> Self {
        let mut catalog = Catalog::default();
        let extra = cfg.map(|c| c.quizzes.iter().map(|q| q.to_quiz()).collect::<Vec<_>>());

        for quiz in seed_quizzes().into_iter().chain(extra.into_iter().flatten()) {
            let id = quiz.id;
            if let Err(e) = catalog.insert(quiz) {
                error!(target: "catalog", quiz_id = id, error = %e, "Skipping invalid quiz.");
            }
        }

        for category in catalog.categories() {
            let count = catalog.quizzes.iter().filter(|q| q.category == category).count();
            info!(target: "catalog", %category, quizzes = count, "Startup catalog inventory");
        }
        catalog
    }

    pub fn insert(&mut self, quiz: Quiz) -> Result<(), CatalogError> {
        validate_quiz(&quiz)?;
        if self.quizzes.iter().any(|q| q.id == quiz.id) {
            return Err(CatalogError::DuplicateQuizId(quiz.id));
        }
        self.quizzes.push(Arc::new(quiz));
        Ok(())
    }

    pub fn find_quiz_by_id(&self, id: QuizId) -> Option<Arc<Quiz>> {
        self.quizzes.iter().find(|q| q.id == id).cloned()
    }

    pub fn all(&self) -> &[Arc<Quiz>] {
        &self.quizzes
    }

    /// Catalog order is preserved.
    pub fn filter(&self, filter: &QuizFilter) -> Vec<Arc<Quiz>> {
        self.quizzes.iter().filter(|q| filter.matches(q)).cloned().collect()
    }

    /// Unique categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for q in &self.quizzes {
            if !out.contains(&q.category) {
                out.push(q.category.clone());
            }
        }
        out
    }

    pub fn title_of(&self, id: QuizId) -> Option<String> {
        self.find_quiz_by_id(id).map(|q| q.title.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::domain::Question;

    fn quiz(id: QuizId, category: &str, difficulty: Difficulty) -> Quiz {
        Quiz {
            id,
            title: format!("Quiz {id}"),
            description: "Something about geography".into(),
            difficulty,
            category: category.into(),
            time_per_question: 10,
            image: None,
            questions: vec![Question {
                id: 1,
                text: "?".into(),
                options: vec!["a".into(), "b".into()],
                correct_answer: 1,
                explanation: None,
            }],
        }
    }

    #[test]
    fn seeds_are_all_valid() {
        let catalog = Catalog::from_config(None);
        assert_eq!(catalog.all().len(), seed_quizzes().len());
        for q in seed_quizzes() {
            assert_eq!(validate_quiz(&q), Ok(()));
        }
    }

    #[test]
    fn lookup_unknown_id_is_none() {
        let catalog = Catalog::from_config(None);
        assert_eq!(catalog.find_quiz_by_id(2).map(|q| q.title.clone()).as_deref(), Some("JavaScript Fundamentals"));
        assert!(catalog.find_quiz_by_id(999).is_none());
    }

    #[test]
    fn validation_rejects_broken_quizzes() {
        let mut q = quiz(7, "Geo", Difficulty::Easy);
        q.questions.clear();
        assert_eq!(validate_quiz(&q), Err(CatalogError::EmptyQuestions(7)));

        let mut q = quiz(7, "Geo", Difficulty::Easy);
        q.questions[0].options.truncate(1);
        assert_eq!(validate_quiz(&q), Err(CatalogError::TooFewOptions { quiz: 7, question: 1 }));

        let mut q = quiz(7, "Geo", Difficulty::Easy);
        q.questions[0].correct_answer = 2;
        assert_eq!(
            validate_quiz(&q),
            Err(CatalogError::CorrectAnswerOutOfRange { quiz: 7, question: 1, index: 2 })
        );

        let mut q = quiz(7, "Geo", Difficulty::Easy);
        q.time_per_question = 0;
        assert_eq!(validate_quiz(&q), Err(CatalogError::ZeroTimeLimit(7)));

        let mut q = quiz(7, "Geo", Difficulty::Easy);
        let dup = q.questions[0].clone();
        q.questions.push(dup);
        assert_eq!(validate_quiz(&q), Err(CatalogError::DuplicateQuestionId { quiz: 7, question: 1 }));
    }

    #[test]
    fn duplicate_quiz_id_is_rejected() {
        let mut catalog = Catalog::default();
        catalog.insert(quiz(1, "Geo", Difficulty::Easy)).unwrap();
        assert_eq!(catalog.insert(quiz(1, "Geo", Difficulty::Hard)), Err(CatalogError::DuplicateQuizId(1)));
    }

    #[test]
    fn filters_combine() {
        let mut catalog = Catalog::default();
        catalog.insert(quiz(1, "Geo", Difficulty::Easy)).unwrap();
        catalog.insert(quiz(2, "History", Difficulty::Easy)).unwrap();
        catalog.insert(quiz(3, "Geo", Difficulty::Hard)).unwrap();

        let ids = |f: QuizFilter| catalog.filter(&f).iter().map(|q| q.id).collect::<Vec<_>>();

        assert_eq!(ids(QuizFilter::default()), vec![1, 2, 3]);
        assert_eq!(ids(QuizFilter { category: Some("Geo".into()), ..Default::default() }), vec![1, 3]);
        assert_eq!(
            ids(QuizFilter { category: Some("Geo".into()), difficulty: Some(Difficulty::Hard), ..Default::default() }),
            vec![3]
        );
        assert_eq!(ids(QuizFilter { search: Some("QUIZ 2".into()), ..Default::default() }), vec![2]);
        assert_eq!(ids(QuizFilter { search: Some("geography".into()), ..Default::default() }), vec![1, 2, 3]);
        assert_eq!(ids(QuizFilter { search: Some("".into()), category: Some("".into()), ..Default::default() }), vec![1, 2, 3]);
        assert!(ids(QuizFilter { search: Some("chemistry".into()), ..Default::default() }).is_empty());
        assert_eq!(catalog.categories(), vec!["Geo".to_string(), "History".to_string()]);
    }

    #[test]
    fn config_quizzes_extend_seeds_and_invalid_ones_are_skipped() {
        let raw = r#"
[[quizzes]]
id = 20
title = "Capitals"
difficulty = "easy"
category = "Geography"
time_per_question = 15
[[quizzes.questions]]
id = 1
text = "Capital of France?"
options = ["Paris", "Rome"]
correct_answer = 0

[[quizzes]]
id = 1
title = "Clashes with a seed id"
difficulty = "easy"
category = "Geography"
time_per_question = 15
[[quizzes.questions]]
id = 1
text = "?"
options = ["a", "b"]
correct_answer = 0

[[quizzes]]
id = 21
title = "No questions"
difficulty = "hard"
category = "Geography"
time_per_question = 15
"#;
        let cfg = parse_config(raw).unwrap();
        let catalog = Catalog::from_config(Some(&cfg));
        assert_eq!(catalog.all().len(), seed_quizzes().len() + 1);
        assert_eq!(catalog.title_of(20).as_deref(), Some("Capitals"));
        assert_eq!(catalog.title_of(1).as_deref(), Some("Web Development Basics"));
        assert!(catalog.find_quiz_by_id(21).is_none());
        assert_eq!(catalog.categories(), vec!["Programming".to_string(), "Geography".to_string()]);
    }
}
