pub mod command;
pub mod conversation;
pub mod dispatcher;
pub mod router;

pub use command::Command;
pub use conversation::{ConversationController, ERROR_MESSAGE};
pub use dispatcher::Dispatcher;
pub use router::{MessageRouter, RouterSettings};
