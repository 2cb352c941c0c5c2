use eframe::egui;
use std::path::PathBuf;

use crate::command::{CommandDescriptor, DispatchOutcome, Dispatcher, SkipReason};
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::file_handler::FileHandler;
use crate::histogram::Histogram;
use crate::panels;
use crate::presenter::NativePresenter;
use crate::prompt::{ParamDialog, PromptResponse};
use crate::renderer::Renderer;
use crate::settings::EditorSettings;
use crate::transform::{ExportFormat, ExportOptions};

/// Last thing worth telling the user, shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(err: &EditorError) -> Self {
        Self {
            text: err.to_string(),
            is_error: true,
        }
    }
}

/// We derive Deserialize/Serialize so we can persist the settings on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct ImageEditorApp {
    settings: EditorSettings,
    show_histogram: bool,

    // The document itself is never persisted
    #[serde(skip)]
    document: Document,
    #[serde(skip)]
    renderer: Renderer,
    #[serde(skip)]
    file_handler: FileHandler,
    #[serde(skip)]
    param_dialog: Option<ParamDialog>,
    #[serde(skip)]
    status: Option<StatusMessage>,
    #[serde(skip)]
    show_settings: bool,
    /// Histogram of the image with the given id
    #[serde(skip)]
    histogram: Option<(usize, Histogram)>,
}

impl Default for ImageEditorApp {
    fn default() -> Self {
        Self {
            settings: EditorSettings::default(),
            show_histogram: false,
            document: Document::new(),
            renderer: Renderer::new(),
            file_handler: FileHandler::new(),
            param_dialog: None,
            status: None,
            show_settings: false,
            histogram: None,
        }
    }
}

impl ImageEditorApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous settings (if any).
        if let Some(storage) = cc.storage {
            if let Some(app) = eframe::get_value::<Self>(storage, eframe::APP_KEY) {
                log::info!("Restored settings: {:?}", app.settings);
                return app;
            }
        }
        Self::default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut EditorSettings {
        &mut self.settings
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn show_histogram_mut(&mut self) -> &mut bool {
        &mut self.show_histogram
    }

    pub fn show_settings_mut(&mut self) -> &mut bool {
        &mut self.show_settings
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::from_settings(&self.settings)
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            jpeg_quality: self.settings.jpeg_quality,
            alpha_policy: self.settings.alpha_policy,
            background: self.settings.background,
        }
    }

    /// True while a parameter dialog is waiting for input
    pub fn prompt_open(&self) -> bool {
        self.param_dialog.is_some()
    }

    /// Start a menu command, opening its parameter dialog first if it has one
    pub fn run_command(&mut self, ctx: &egui::Context, command: &'static CommandDescriptor) {
        if self.prompt_open() {
            log::debug!("Ignoring {:?}: a parameter dialog is open", command.id);
            return;
        }
        if self.document.is_loaded() {
            if let Some(dialog) = ParamDialog::for_command(command) {
                self.param_dialog = Some(dialog);
                return;
            }
        }
        let dispatcher = self.dispatcher();
        let mut presenter = NativePresenter::new(ctx, &mut self.renderer);
        let result = dispatcher.dispatch(&mut self.document, command, &mut presenter);
        self.report_dispatch(command.label, result);
    }

    fn submit_param(&mut self, ctx: &egui::Context, command: &'static CommandDescriptor, param: crate::command::Param) {
        let dispatcher = self.dispatcher();
        let mut presenter = NativePresenter::with_answer(ctx, &mut self.renderer, param);
        let result = dispatcher.dispatch(&mut self.document, command, &mut presenter);
        self.report_dispatch(command.label, result);
    }

    pub fn undo(&mut self, ctx: &egui::Context) {
        if self.prompt_open() {
            return;
        }
        let dispatcher = self.dispatcher();
        let mut presenter = NativePresenter::new(ctx, &mut self.renderer);
        if dispatcher.undo(&mut self.document, &mut presenter).is_applied() {
            self.status = None;
        }
    }

    pub fn redo(&mut self, ctx: &egui::Context) {
        if self.prompt_open() {
            return;
        }
        let dispatcher = self.dispatcher();
        let mut presenter = NativePresenter::new(ctx, &mut self.renderer);
        if dispatcher.redo(&mut self.document, &mut presenter).is_applied() {
            self.status = None;
        }
    }

    pub fn open(&mut self, ctx: &egui::Context) {
        let mut presenter = NativePresenter::new(ctx, &mut self.renderer);
        match FileHandler::open(&mut self.document, &mut presenter) {
            Ok(true) => self.after_open(),
            Ok(false) => {}
            Err(err) => self.report_error("Open failed", err),
        }
    }

    /// Open `path` directly, bypassing the file dialog
    pub fn open_path(&mut self, ctx: &egui::Context, path: PathBuf) {
        let mut presenter = NativePresenter::new(ctx, &mut self.renderer);
        match FileHandler::open_path(&mut self.document, path, &mut presenter) {
            Ok(()) => self.after_open(),
            Err(err) => self.report_error("Open failed", err),
        }
    }

    /// Save via a dialog; `None` picks the format from the chosen extension
    pub fn save_image(&mut self, ctx: &egui::Context, format: Option<ExportFormat>) {
        let options = self.export_options();
        let mut presenter = NativePresenter::new(ctx, &mut self.renderer);
        match FileHandler::save(&mut self.document, &mut presenter, format, &options) {
            Ok(Some(path)) => self.status = Some(StatusMessage::info(format!("Saved {}", path.display()))),
            Ok(None) => {}
            Err(err) => self.report_error("Save failed", err),
        }
    }

    pub fn export_settings(&mut self) {
        let Some(path) = pick_settings_file(true) else {
            return;
        };
        if let Err(err) = self.settings.save_to(&path) {
            self.report_error("Settings export failed", err);
        }
    }

    pub fn import_settings(&mut self) {
        let Some(path) = pick_settings_file(false) else {
            return;
        };
        match EditorSettings::load_from(&path) {
            Ok(settings) => self.settings = settings,
            Err(err) => self.report_error("Settings import failed", err),
        }
    }

    /// Histogram of the current snapshot, recomputed when the snapshot changes
    pub fn histogram(&mut self) -> Option<&Histogram> {
        let image = self.document.current_image()?;
        let stale = !matches!(&self.histogram, Some((id, _)) if *id == image.id());
        if stale {
            self.histogram = Some((image.id(), Histogram::from_image(image.pixels())));
        }
        self.histogram.as_ref().map(|(_, histogram)| histogram)
    }

    /// Releases textures of the previous document; the new one is already uploaded
    fn after_open(&mut self) {
        self.renderer.retain_history(&self.document);
        self.histogram = None;
        self.param_dialog = None;
        self.status = self.document.path().map(|path| StatusMessage::info(format!("Opened {}", path.display())));
    }

    fn report_dispatch(&mut self, label: &str, result: EditorResult<DispatchOutcome>) {
        match result {
            Ok(DispatchOutcome::Applied) => {
                self.status = None;
                self.renderer.retain_history(&self.document);
            }
            Ok(DispatchOutcome::Skipped(SkipReason::Unchanged)) => {
                self.status = Some(StatusMessage::info(format!("{} made no change", label.trim_end_matches('…'))));
            }
            Ok(DispatchOutcome::Skipped(_)) => {}
            Err(err) => self.report_error(label.trim_end_matches('…'), err),
        }
    }

    fn report_error(&mut self, context: &str, err: EditorError) {
        log::error!("{}: {}", context, err);
        self.status = Some(StatusMessage::error(&err));
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::{Key, KeyboardShortcut, Modifiers};

        // Leave keys to the dialog while one is open
        if self.prompt_open() {
            return;
        }

        const OPEN: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
        const SAVE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::S);
        const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
        const REDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);
        const REDO_SHIFT: KeyboardShortcut =
            KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z);

        // Check the more specific shortcut first so Ctrl+Shift+Z is not taken as undo
        if ctx.input_mut(|i| i.consume_shortcut(&REDO_SHIFT) || i.consume_shortcut(&REDO)) {
            self.redo(ctx);
        } else if ctx.input_mut(|i| i.consume_shortcut(&UNDO)) {
            self.undo(ctx);
        } else if ctx.input_mut(|i| i.consume_shortcut(&OPEN)) {
            self.open(ctx);
        } else if ctx.input_mut(|i| i.consume_shortcut(&SAVE)) {
            self.save_image(ctx, None);
        }
    }

    fn show_param_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.param_dialog else {
            return;
        };
        match dialog.show(ctx) {
            PromptResponse::Pending => {}
            PromptResponse::Cancelled => {
                log::debug!("{} cancelled", dialog.command().label);
                self.param_dialog = None;
            }
            PromptResponse::Submitted(param) => {
                let command = dialog.command();
                self.param_dialog = None;
                self.submit_param(ctx, command, param);
            }
        }
    }
}

fn pick_settings_file(save: bool) -> Option<PathBuf> {
    let dialog = rfd::FileDialog::new()
        .set_title("Editor Settings")
        .add_filter("JSON", &["json"]);
    if save {
        dialog.set_file_name("image_editor_settings.json").save_file()
    } else {
        dialog.pick_file()
    }
}

impl eframe::App for ImageEditorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.renderer.begin_frame();
        self.renderer.set_allow_upscale(self.settings.upscale_preview);
        self.document.set_history_limit(self.settings.max_history);

        self.handle_shortcuts(ctx);

        panels::menu_bar(self, ctx);
        panels::status_bar(self, ctx);
        panels::history_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::histogram_window(self, ctx);
        panels::settings_window(self, ctx);

        self.show_param_dialog(ctx);

        self.file_handler.preview_files_being_dropped(ctx);
        if self.file_handler.check_for_dropped_files(ctx) {
            let mut presenter = NativePresenter::new(ctx, &mut self.renderer);
            match self.file_handler.process_dropped_files(&mut self.document, &mut presenter) {
                Ok(true) => self.after_open(),
                Ok(false) => {}
                Err(err) => self.report_error("Open failed", err),
            }
        }
    }
}
