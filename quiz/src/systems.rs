use {
    crate::{
        AdvanceQuiz, AnswerSelected, BeginQuestions, CORRECT_TALLY, QuestionClock, QuizPhase,
        QuizSession, StartQuiz,
    },
    bevy::prelude::*,
    minigame_assets::{Library, QuizSet},
    progression::Progression,
    progression_events::{TallyBump, UnitCompleted},
};

fn lookup<'a>(
    library: &Library<QuizSet>,
    quizzes: &'a Assets<QuizSet>,
    quiz_id: &str,
) -> Option<&'a QuizSet> {
    library.handle(quiz_id).and_then(|handle| quizzes.get(handle))
}

/// Observer that opens a quiz session, validating content and unlock
/// state first. Refusals are logged and the screen simply stays empty.
pub fn start_quiz(
    trigger: On<StartQuiz>,
    library: Res<Library<QuizSet>>,
    quizzes: Res<Assets<QuizSet>>,
    progression: Res<Progression>,
    mut commands: Commands,
) {
    let quiz_id = &trigger.event().0;
    let Some(set) = lookup(&library, &quizzes, quiz_id) else {
        warn!(%quiz_id, "quiz content not loaded");
        return;
    };
    if set.questions.is_empty() {
        warn!(%quiz_id, "quiz has no questions");
        return;
    }
    if !progression.is_unlocked(&set.unit) {
        warn!(%quiz_id, unit_id = %set.unit, "quiz unit is still locked");
        return;
    }

    debug!(%quiz_id, questions = set.questions.len(), "quiz started");
    commands.insert_resource(QuizSession {
        quiz_id: set.id.clone(),
        unit_id: set.unit.clone(),
        index: 0,
        correct: 0,
        score: 0,
        phase: QuizPhase::Instructions,
        reported: false,
    });
}

/// Observer that leaves the instructions card and starts the first
/// question's countdown.
pub fn begin_questions(
    _trigger: On<BeginQuestions>,
    session: Option<ResMut<QuizSession>>,
    library: Res<Library<QuizSet>>,
    quizzes: Res<Assets<QuizSet>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.phase != QuizPhase::Instructions {
        return;
    }
    let Some(set) = lookup(&library, &quizzes, &session.quiz_id) else {
        return;
    };
    session.phase = QuizPhase::Asking;
    commands.insert_resource(QuestionClock(Timer::from_seconds(
        set.seconds_per_question,
        TimerMode::Once,
    )));
}

/// Observer grading the picked answer. Out-of-range choices are graded
/// as wrong, never as a crash.
pub fn on_answer_selected(
    trigger: On<AnswerSelected>,
    session: Option<ResMut<QuizSession>>,
    library: Res<Library<QuizSet>>,
    quizzes: Res<Assets<QuizSet>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.phase != QuizPhase::Asking {
        debug!("answer arrived outside a question, ignored");
        return;
    }
    let Some(set) = lookup(&library, &quizzes, &session.quiz_id) else {
        return;
    };
    let Some(question) = set.questions.get(session.index) else {
        return;
    };

    let choice = trigger.event().choice;
    let correct = choice < question.choices.len() && choice == question.answer;
    if correct {
        session.correct += 1;
        session.score += question.points;
        commands.trigger(TallyBump {
            counter: CORRECT_TALLY.to_string(),
            amount: 1,
        });
    }
    enter_feedback(&mut session, correct, &mut commands);
}

/// Ticks the countdown of the question being asked. A finished clock is
/// the same outcome as picking a wrong answer.
pub fn tick_question_clock(
    time: Res<Time>,
    clock: Option<ResMut<QuestionClock>>,
    session: Option<ResMut<QuizSession>>,
    mut commands: Commands,
) {
    let (Some(mut clock), Some(mut session)) = (clock, session) else {
        return;
    };
    if session.phase != QuizPhase::Asking {
        return;
    }
    clock.0.tick(time.delta());
    if clock.0.is_finished() {
        debug!(index = session.index, "question timed out");
        enter_feedback(&mut session, false, &mut commands);
    }
}

/// Observer that dismisses feedback or the summary card.
///
/// From feedback it moves to the next question or the summary; a failed
/// summary restarts the attempt from the first question without having
/// emitted anything.
pub fn advance_quiz(
    _trigger: On<AdvanceQuiz>,
    session: Option<ResMut<QuizSession>>,
    library: Res<Library<QuizSet>>,
    quizzes: Res<Assets<QuizSet>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    let Some(set) = lookup(&library, &quizzes, &session.quiz_id) else {
        return;
    };

    match session.phase {
        QuizPhase::Feedback { .. } => {
            session.index += 1;
            if session.index < set.questions.len() {
                session.phase = QuizPhase::Asking;
                commands.insert_resource(QuestionClock(Timer::from_seconds(
                    set.seconds_per_question,
                    TimerMode::Once,
                )));
            } else {
                let passed = session.correct >= set.pass_mark;
                session.phase = QuizPhase::Summary { passed };
                info!(
                    quiz_id = %session.quiz_id,
                    correct = session.correct,
                    passed,
                    "quiz finished"
                );
                if passed && !session.reported {
                    session.reported = true;
                    commands.trigger(UnitCompleted {
                        unit_id: session.unit_id.clone(),
                        score: session.score + set.completion_bonus,
                    });
                }
            }
        }
        QuizPhase::Summary { passed: false } => {
            debug!(quiz_id = %session.quiz_id, "retrying quiz");
            session.index = 0;
            session.correct = 0;
            session.score = 0;
            session.phase = QuizPhase::Asking;
            commands.insert_resource(QuestionClock(Timer::from_seconds(
                set.seconds_per_question,
                TimerMode::Once,
            )));
        }
        _ => {}
    }
}

fn enter_feedback(session: &mut QuizSession, correct: bool, commands: &mut Commands) {
    session.phase = QuizPhase::Feedback { correct };
    commands.remove_resource::<QuestionClock>();
}

/// Releases the session and any live countdown when the screen exits.
pub fn cleanup_quiz(mut commands: Commands) {
    commands.remove_resource::<QuizSession>();
    commands.remove_resource::<QuestionClock>();
}
