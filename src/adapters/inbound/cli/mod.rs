//! Terminal-facing adapters used by the command line binary

mod prompt;

pub use prompt::StdinPrompt;
