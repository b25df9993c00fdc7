use dialoguer::Confirm;
use healthsync_core::{Access, ConsentPrompt, SampleType};

/// Asks on the terminal. A failed prompt (no tty, interrupted) leaves the
/// pair undecided.
pub struct TerminalConsent;

impl ConsentPrompt for TerminalConsent {
    fn ask(&self, sample_type: SampleType, access: Access) -> Option<bool> {
        Confirm::new()
            .with_prompt(prompt_for(sample_type, access))
            .default(false)
            .interact()
            .ok()
    }
}

fn prompt_for(sample_type: SampleType, access: Access) -> String {
    match access {
        Access::Share => format!("Allow HealthSync to write {} samples?", sample_type),
        Access::Read => format!("Allow HealthSync to read {} samples?", sample_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_type_and_direction() {
        assert_eq!(
            prompt_for(SampleType::StepCount, Access::Read),
            "Allow HealthSync to read step_count samples?"
        );
        assert_eq!(
            prompt_for(SampleType::MindfulSession, Access::Share),
            "Allow HealthSync to write mindful_session samples?"
        );
    }
}
