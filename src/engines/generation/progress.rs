use super::evolution_engine::{GenerationPhase, GenerationSummary, ProgressCallback};
use std::sync::mpsc::Sender;

/// Logs progress through the `log` facade
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_phase_change(&mut self, phase: GenerationPhase) {
        match phase {
            GenerationPhase::Evolving { generation } => {
                log::info!("Generation {} starting...", generation)
            }
            other => log::debug!("Phase: {:?}", other),
        }
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        match &summary.best {
            Some(best) => log::info!(
                "Generation {} complete. Best cosine: {:.4}, rmse: {:.4}, accepted {}/{} offspring",
                summary.generation,
                best.cosine,
                best.rmse,
                summary.accepted,
                summary.accepted + summary.rejected
            ),
            None => log::info!(
                "Generation {} complete. No rankable members",
                summary.generation
            ),
        }
    }
}

/// Ignores all progress
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_phase_change(&mut self, _phase: GenerationPhase) {}

    fn on_generation_complete(&mut self, _summary: &GenerationSummary) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    Phase(GenerationPhase),
    GenerationComplete(GenerationSummary),
}

/// Forwards progress to another thread, e.g. a run driven from a worker pool
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_phase_change(&mut self, phase: GenerationPhase) {
        let _ = self.sender.send(ProgressMessage::Phase(phase));
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(summary.clone()));
    }
}
