//! Command implementations.

pub mod answer;
pub mod export_publish;
pub mod questions;
pub mod run;
pub mod sweep;

pub use self::answer::{answer_from_source, execute_answer, AnswerOutput};
pub use self::export_publish::execute_export_publish;
pub use self::questions::{execute_questions, print_question_report};
pub use self::run::{execute_run, run_from_source, RunOutcome};
pub use self::sweep::execute_sweep;
