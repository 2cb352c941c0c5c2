use eframe::egui;

use crate::command::{CommandDescriptor, Param, ParamPrompt};

/// What the user did with an open prompt this frame
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResponse {
    Pending,
    Submitted(Param),
    Cancelled,
}

#[derive(Debug, Clone)]
enum PromptInput {
    Float(f32),
    Text(String),
}

/// Modal window collecting the parameter of a command before it runs
#[derive(Debug, Clone)]
pub struct ParamDialog {
    command: &'static CommandDescriptor,
    prompt: ParamPrompt,
    input: PromptInput,
}

impl ParamDialog {
    /// Returns `None` if the command takes no parameter
    pub fn for_command(command: &'static CommandDescriptor) -> Option<Self> {
        let prompt = command.prompt?;
        let input = match prompt {
            ParamPrompt::Float { default, .. } => PromptInput::Float(default),
            ParamPrompt::Text { .. } => PromptInput::Text(String::new()),
        };
        Some(Self {
            command,
            prompt,
            input,
        })
    }

    pub fn command(&self) -> &'static CommandDescriptor {
        self.command
    }

    /// The parameter as currently entered, or why it cannot be used yet
    pub fn current_value(&self) -> Result<Param, String> {
        match (&self.prompt, &self.input) {
            (ParamPrompt::Float { min, max, .. }, PromptInput::Float(value)) => {
                if (*min..=*max).contains(value) {
                    Ok(Param::Float(*value))
                } else {
                    Err(format!("Enter a value between {min} and {max}"))
                }
            }
            (ParamPrompt::Text { validate, .. }, PromptInput::Text(text)) => validate(text)
                .map(|_| Param::Text(text.clone()))
                .map_err(|err| err.to_string()),
            _ => Err("Prompt does not match its input".to_owned()),
        }
    }

    /// Draws the dialog over a backdrop that blocks the rest of the UI.
    /// Enter submits a valid value; Escape or a click outside cancels.
    pub fn show(&mut self, ctx: &egui::Context) -> PromptResponse {
        let mut response = PromptResponse::Pending;

        let modal = egui::Modal::new(egui::Id::new("param_dialog")).show(ctx, |ui| {
            ui.set_width(280.0);
            ui.heading(self.command.label.trim_end_matches('…'));
            ui.label(self.prompt.title());

            match (&self.prompt, &mut self.input) {
                (ParamPrompt::Float { min, max, .. }, PromptInput::Float(value)) => {
                    ui.add(egui::DragValue::new(value).range(*min..=*max).speed(0.01 * (*max - *min)));
                    ui.add(egui::Slider::new(value, *min..=*max).show_value(false));
                }
                (ParamPrompt::Text { hint, .. }, PromptInput::Text(text)) => {
                    let edit = ui.add(egui::TextEdit::singleline(text).hint_text(*hint));
                    if !edit.has_focus() && text.is_empty() {
                        edit.request_focus();
                    }
                }
                _ => {}
            }

            let value = self.current_value();
            if let Err(reason) = &value {
                ui.colored_label(ui.visuals().warn_fg_color, reason);
            }

            ui.separator();
            ui.horizontal(|ui| {
                let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                let ok = ui.add_enabled(value.is_ok(), egui::Button::new("OK")).clicked();
                if ok || enter {
                    if let Ok(param) = value {
                        response = PromptResponse::Submitted(param);
                    }
                }
                if ui.button("Cancel").clicked() {
                    response = PromptResponse::Cancelled;
                }
            });
        });

        if modal.should_close() {
            response = PromptResponse::Cancelled;
        }
        response
    }
}
