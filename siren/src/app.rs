use crate::menu::Menu;
use siren_core::{AudioConfig, OscillatorKind, pcm};
use siren_patterns::{AlertDuration, Pattern};
use siren_persist::ConfigStore;
use siren_player::{Playback, Sink};

const TITLE: &str = "Choose a signal";
const DURATION_PROMPT: &str = "How long in seconds should the alert last?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Quit,
    Settings,
    Play(Pattern),
}

impl Selection {
    /// Main menu entries in order.
    pub fn all() -> Vec<Self> {
        [Self::Quit, Self::Settings]
            .into_iter()
            .chain(Pattern::ALL.into_iter().map(Self::Play))
            .collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Quit => "QUIT",
            Self::Settings => "SETTINGS",
            Self::Play(pattern) => pattern.name(),
        }
    }
}

pub struct App {
    config: AudioConfig,
    store: ConfigStore,
    sink: Sink,
}

impl App {
    pub fn new(config: AudioConfig, store: ConfigStore, sink: Sink) -> Self {
        Self {
            config,
            store,
            sink,
        }
    }

    /// Synthesize a pattern and play it, blocking until playback ends. Status messages go to
    /// `status`.
    pub fn play(
        &mut self,
        pattern: Pattern,
        duration: Option<AlertDuration>,
        mut status: impl FnMut(&str) -> anyhow::Result<()>,
    ) -> anyhow::Result<Playback> {
        if pattern.announces_generation() {
            status("Generating...")?;
        }
        let samples = pattern.render(&self.config, duration)?;
        status("Playing")?;
        let playback = self.sink.write(&pcm::serialize(&samples))?;
        log::info!("{}: {:?}", pattern, playback);
        Ok(playback)
    }

    /// Returns false if the menu was quit rather than left with Back.
    fn settings(&mut self, menu: &mut Menu) -> anyhow::Result<bool> {
        loop {
            match menu.choose("Settings", &["Back", "Wave Type"])? {
                Some(1) => {
                    let options = ["Back", "Sine", "Sawtooth"];
                    let current = self.config.oscillator_kind.name();
                    let title = format!("Wave Type (currently {})", current);
                    match menu.choose(&title, &options)? {
                        Some(1) => self.config.oscillator_kind = OscillatorKind::Sine,
                        Some(2) => {
                            self.config.oscillator_kind = OscillatorKind::Sawtooth
                        }
                        Some(_) => (),
                        None => return Ok(false),
                    }
                }
                Some(_) => {
                    self.store.save_(&self.config);
                    return Ok(true);
                }
                None => return Ok(false),
            }
        }
    }

    /// Run the main menu until the user quits or playback is interrupted.
    pub fn run_menu(&mut self, menu: &mut Menu) -> anyhow::Result<()> {
        let selections = Selection::all();
        let labels = selections.iter().map(|s| s.label()).collect::<Vec<_>>();
        let title = format!(
            "{} - Digital Siren Controller v{}",
            TITLE,
            env!("CARGO_PKG_VERSION")
        );
        loop {
            let Some(index) = menu.choose(&title, &labels)? else {
                return Ok(());
            };
            match selections[index] {
                Selection::Quit => return Ok(()),
                Selection::Settings => {
                    if !self.settings(menu)? {
                        return Ok(());
                    }
                }
                Selection::Play(pattern) => {
                    let duration = if pattern.takes_duration() {
                        let range = AlertDuration::MIN_S..=AlertDuration::MAX_S;
                        let Some(secs) = menu.numeric_input(DURATION_PROMPT, range)?
                        else {
                            return Ok(());
                        };
                        Some(AlertDuration::from_secs(secs)?)
                    } else {
                        None
                    };
                    let playback =
                        self.play(pattern, duration, |message| menu.display(message))?;
                    if playback == Playback::Interrupted {
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn main_menu_order() {
        let selections = Selection::all();
        assert_eq!(selections.len(), 14);
        assert_eq!(selections[0], Selection::Quit);
        assert_eq!(selections[1], Selection::Settings);
        assert_eq!(selections[2], Selection::Play(Pattern::DualAlert));
        assert_eq!(selections[13], Selection::Play(Pattern::DualChimes));
        assert_eq!(selections[10].label(), "Single Alert");
    }
}
