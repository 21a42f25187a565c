use crate::router::MessageRouter;
use std::future::Future;
use std::sync::Arc;
use todobot_channels::IncomingMessage;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Feeds inbound messages to the router one at a time, in receipt order.
pub struct Dispatcher {
    router: Arc<MessageRouter>,
}

impl Dispatcher {
    pub fn new(router: Arc<MessageRouter>) -> Self {
        Self { router }
    }

    /// Run until the message stream closes or `shutdown` completes.
    ///
    /// Returns the number of messages handled.
    pub async fn run(
        &self,
        mut messages: mpsc::Receiver<IncomingMessage>,
        shutdown: impl Future<Output = ()>,
    ) -> usize {
        tokio::pin!(shutdown);
        let mut handled = 0;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(handled, "Shutdown requested, stopping dispatcher");
                    break;
                }
                next = messages.recv() => match next {
                    Some(msg) => {
                        self.dispatch(&msg).await;
                        handled += 1;
                    }
                    None => {
                        info!(handled, "Message stream closed, stopping dispatcher");
                        break;
                    }
                },
            }
        }

        handled
    }

    /// Handle one message. Failures are logged, never retried or shown to the user.
    pub async fn dispatch(&self, msg: &IncomingMessage) {
        if let Err(e) = self.router.handle_message(msg).await {
            warn!(
                chat_id = msg.chat_id,
                message_id = msg.message_id,
                text = %msg.text,
                error = %e,
                "Update caused error"
            );
        }
    }
}
