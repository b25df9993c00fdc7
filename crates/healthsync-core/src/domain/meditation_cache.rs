use super::{render_samples, SampleRecord};

#[derive(Debug, Clone, Default)]
pub struct MeditationCache {
    samples: Vec<SampleRecord>,
}

impl MeditationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the slot wholesale. An empty result keeps the previous samples.
    pub fn replace(&mut self, samples: Vec<SampleRecord>) -> bool {
        if samples.is_empty() {
            return false;
        }
        self.samples = samples;
        true
    }

    pub fn samples(&self) -> &[SampleRecord] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn render(&self) -> String {
        format!("syncing display: meditation {}", render_samples(&self.samples))
    }
}
