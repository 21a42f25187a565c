pub mod session;
pub mod store;

pub use session::{ConversationState, Session, SessionKey};
pub use store::{MemorySessionStore, SessionStore};
