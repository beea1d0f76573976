use super::*;

/// What a key press asks for, independent of the terminal event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    CycleTransition,
    CycleFit,
    ToggleEffects,
    ToggleClock,
    CyclePreset,
    Refresh,
    Quit,
}

#[must_use]
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Command::Quit);
    }
    let command = match key.code {
        KeyCode::Right | KeyCode::Char(' ' | 'n') => Command::Next,
        KeyCode::Left | KeyCode::Char('p') => Command::Previous,
        KeyCode::Char('t') => Command::CycleTransition,
        KeyCode::Char('f') => Command::CycleFit,
        KeyCode::Char('w') => Command::ToggleEffects,
        KeyCode::Char('c') => Command::ToggleClock,
        KeyCode::Char('e') => Command::CyclePreset,
        KeyCode::Char('r') => Command::Refresh,
        KeyCode::Esc | KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

impl AppState {
    pub(super) async fn handle_input(
        &mut self,
        event: Event,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            Event::Key(key) => {
                if let Some(command) = command_for_key(key) {
                    self.apply_command(command, tx, cli).await?;
                }
            }
            Event::Resize(cols, rows) => self.resize(cols, rows),
            _ => {}
        }
        Ok(())
    }

    pub async fn apply_command(
        &mut self,
        command: Command,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match command {
            Command::Next => {
                self.slideshow.next();
            }
            Command::Previous => {
                self.slideshow.previous();
            }
            Command::CycleTransition => {
                let kind = self.settings.transition.next();
                self.settings.transition = kind;
                self.slideshow.set_transition_type(kind);
                self.show_toast(format!("Transition: {}", kind.display_name()));
                self.persist_settings();
            }
            Command::CycleFit => {
                self.settings.fit = self.settings.fit.next();
                self.show_toast(format!("Fit: {}", self.settings.fit.label()));
                self.persist_settings();
            }
            Command::ToggleEffects => {
                self.settings.weather_effects = !self.settings.weather_effects;
                let state = if self.settings.weather_effects { "on" } else { "off" };
                self.show_toast(format!("Weather effects {state}"));
                self.persist_settings();
            }
            Command::ToggleClock => {
                self.settings.show_clock = !self.settings.show_clock;
                self.persist_settings();
            }
            Command::CyclePreset => {
                self.test_preset = TestPreset::cycle(self.test_preset);
                let label = self.test_preset.map_or("Live weather", TestPreset::label);
                self.show_toast(label);
            }
            Command::Refresh => {
                if self.settings.show_weather {
                    self.start_fetch(tx, cli);
                }
            }
            Command::Quit => {
                self.running = false;
            }
        }
        Ok(())
    }
}
