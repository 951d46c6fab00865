use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use viewport_client::{Command, CommandKind, Result, SignalingOutput};

/// Mock SignalingOutput that captures every command the coordinator sends.
#[derive(Clone)]
pub struct MockSignalingOutput {
    tx: mpsc::UnboundedSender<Command>,
    commands: Arc<Mutex<Vec<Command>>>,
    close_count: Arc<Mutex<usize>>,
}

impl MockSignalingOutput {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let output = Self {
            tx,
            commands: Arc::new(Mutex::new(Vec::new())),
            close_count: Arc::new(Mutex::new(0)),
        };
        (output, rx)
    }

    pub async fn kinds(&self) -> Vec<CommandKind> {
        self.commands.lock().await.iter().map(|c| c.id).collect()
    }

    pub async fn commands_of(&self, kind: CommandKind) -> Vec<Command> {
        self.commands
            .lock()
            .await
            .iter()
            .filter(|c| c.id == kind)
            .cloned()
            .collect()
    }

    pub async fn close_count(&self) -> usize {
        *self.close_count.lock().await
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send(&self, command: Command) -> Result<()> {
        tracing::debug!("[MockSignaling] send {}", command.id);

        self.commands.lock().await.push(command.clone());
        let _ = self.tx.send(command);
        Ok(())
    }

    async fn close(&self) {
        tracing::debug!("[MockSignaling] close");
        *self.close_count.lock().await += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_captures_commands() {
        let (output, mut rx) = MockSignalingOutput::new();

        output.send(Command::request_offer()).await.unwrap();

        let cmd = rx.recv().await.unwrap();
        assert_eq!(cmd.id, CommandKind::Offer);
        assert_eq!(output.kinds().await, vec![CommandKind::Offer]);
    }
}
