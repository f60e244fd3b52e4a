pub mod chat;
pub mod error;

pub use chat::ChatSession;
pub use error::AgentError;
