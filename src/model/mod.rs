pub mod policy;
pub mod seird;
pub mod trajectory;
pub mod transmission;
