use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use healthsync_core::{DisplaySink, MeditationCache, SampleRecord};

pub enum DisplayMessage {
    MeditationUpdated { samples: Vec<SampleRecord> },
    GetSnapshot {
        reply: oneshot::Sender<Vec<SampleRecord>>,
    },
}

/// Owns the meditation cache; every cache write goes through its mailbox.
pub struct DisplaySyncActor {
    receiver: mpsc::Receiver<DisplayMessage>,
    cache: MeditationCache,
    interval: Duration,
    sink: Arc<dyn DisplaySink>,
}

#[derive(Clone)]
pub struct DisplayHandle {
    sender: mpsc::Sender<DisplayMessage>,
}

/// Non-owning handle for late query completions.
#[derive(Clone)]
pub struct WeakDisplayHandle {
    sender: mpsc::WeakSender<DisplayMessage>,
}

impl DisplayHandle {
    pub async fn publish_meditation(
        &self,
        samples: Vec<SampleRecord>,
    ) -> Result<(), mpsc::error::SendError<DisplayMessage>> {
        self.sender
            .send(DisplayMessage::MeditationUpdated { samples })
            .await
    }

    pub async fn snapshot(&self) -> Option<Vec<SampleRecord>> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(DisplayMessage::GetSnapshot {
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }

    pub fn downgrade(&self) -> WeakDisplayHandle {
        WeakDisplayHandle {
            sender: self.sender.downgrade(),
        }
    }
}

impl WeakDisplayHandle {
    /// Returns `false` and does nothing once the display is gone.
    pub async fn publish_meditation(&self, samples: Vec<SampleRecord>) -> bool {
        let Some(sender) = self.sender.upgrade() else {
            debug!("display released, dropping meditation result");
            return false;
        };

        if sender
            .send(DisplayMessage::MeditationUpdated { samples })
            .await
            .is_err()
        {
            debug!("display stopped, dropping meditation result");
            return false;
        }
        true
    }
}

impl DisplaySyncActor {
    pub fn new(interval: Duration, sink: Arc<dyn DisplaySink>) -> (Self, DisplayHandle) {
        let (sender, receiver) = mpsc::channel(32);

        let actor = Self {
            receiver,
            cache: MeditationCache::new(),
            interval,
            sink,
        };

        let handle = DisplayHandle { sender };

        (actor, handle)
    }

    /// Renders the current cache. Issues no query.
    pub fn on_tick(&self) {
        self.sink.show(&self.cache.render());
    }

    fn handle(&mut self, message: DisplayMessage) {
        match message {
            DisplayMessage::MeditationUpdated { samples } => {
                let sample_count = samples.len();
                if self.cache.replace(samples) {
                    debug!(sample_count, "meditation cache replaced");
                } else {
                    debug!("empty meditation result, keeping cached samples");
                }
            }
            DisplayMessage::GetSnapshot { reply } => {
                let _ = reply.send(self.cache.samples().to_vec());
            }
        }
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        info!(interval_seconds = self.interval.as_secs(), "display sync started");

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);

        loop {
            tokio::select! {
                Some(message) = self.receiver.recv() => {
                    self.handle(message);
                }
                _ = ticker.tick() => {
                    self.on_tick();
                }
                _ = shutdown.recv() => {
                    debug!("display sync shutdown");
                    break;
                }
            }
        }
    }
}
