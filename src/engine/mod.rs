pub mod outfit;
pub mod parser;
pub mod prompt;
pub mod provider;
