//! Quiz mini-game adapter.
//!
//! A quiz walks through its questions one at a time, each under a
//! countdown. Running out of time is not an error: it is handled exactly
//! like a wrong answer (zero points, incorrect feedback). Passing emits a
//! single [`progression_events::UnitCompleted`] for the quiz's unit;
//! failed attempts can be retried any number of times without emitting
//! anything.

pub mod systems;


use {bevy::prelude::*, states::ScreenState, system_schedule::GameSchedule};

/// Counter bumped once per correctly answered question.
pub const CORRECT_TALLY: &str = "quiz:correct";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Instructions,
    Asking,
    Feedback { correct: bool },
    Summary { passed: bool },
}

/// State of the quiz attempt currently on screen. Inserted by
/// [`systems::start_quiz`], removed when the screen exits.
#[derive(Resource, Debug)]
pub struct QuizSession {
    pub quiz_id: String,
    pub unit_id: String,
    /// Index of the current question.
    pub index: usize,
    pub correct: u32,
    /// Per-question points earned this attempt.
    pub score: u32,
    pub phase: QuizPhase,
    /// Completion already emitted for this session.
    reported: bool,
}

impl QuizSession {
    pub fn reported(&self) -> bool {
        self.reported
    }
}

/// Countdown for the question being asked. Exists only while a question
/// is on screen; every exit path removes it.
#[derive(Resource)]
pub struct QuestionClock(pub Timer);

// --- Control events (triggered by the quiz screen UI) ---

/// Open the quiz with the given content id.
#[derive(Debug, Event)]
pub struct StartQuiz(pub String);

/// Leave the instructions card and ask the first question.
#[derive(Debug, Event)]
pub struct BeginQuestions;

/// The learner picked an answer for the current question.
#[derive(Debug, Event)]
pub struct AnswerSelected {
    pub choice: usize,
}

/// Dismiss feedback / the summary card and move on.
#[derive(Debug, Event)]
pub struct AdvanceQuiz;

pub struct QuizPlugin;

impl Plugin for QuizPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(systems::start_quiz)
            .add_observer(systems::begin_questions)
            .add_observer(systems::on_answer_selected)
            .add_observer(systems::advance_quiz)
            .add_systems(
                Update,
                systems::tick_question_clock
                    .in_set(GameSchedule::ResolveInput)
                    .run_if(in_state(ScreenState::Quiz)),
            )
            .add_systems(OnExit(ScreenState::Quiz), systems::cleanup_quiz);
    }
}
