pub mod exercise_log;
pub mod learned_words;
pub mod mailer;
pub mod profanity;
pub mod translator;
