use super::commands::{CommandDescriptor, CommandId, TransformContext, descriptor};
use super::history::HistoryError;
use super::params::{Param, ParamPrompt};
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::presenter::Presenter;
use crate::settings::{CommitPolicy, EditorSettings};
use crate::snapshot::Image;

/// Why a dispatch finished without touching the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoImageLoaded,
    DialogCancelled,
    /// The command produced identical pixels and the policy skips those
    Unchanged,
    NoPriorVersion,
    NoNewerVersion,
}

impl From<HistoryError> for SkipReason {
    fn from(error: HistoryError) -> Self {
        match error {
            HistoryError::NoPriorVersion => SkipReason::NoPriorVersion,
            HistoryError::NoNewerVersion => SkipReason::NoNewerVersion,
            HistoryError::EmptyHistory => SkipReason::NoImageLoaded,
        }
    }
}

/// Result of a dispatch that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The document moved to a new snapshot and a redraw was requested
    Applied,
    Skipped(SkipReason),
}

impl DispatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DispatchOutcome::Applied)
    }
}

/// Runs commands against a document: prompt, transform, commit, redraw.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    pub commit_policy: CommitPolicy,
    pub context: TransformContext,
}

impl Dispatcher {
    pub fn new(commit_policy: CommitPolicy, context: TransformContext) -> Self {
        Self {
            commit_policy,
            context,
        }
    }

    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self::new(
            settings.commit_policy,
            TransformContext {
                draw_color: image::Rgba(settings.draw_color),
            },
        )
    }

    /// Looks up `id` and dispatches it
    pub fn dispatch_id(
        &self,
        document: &mut Document,
        id: CommandId,
        presenter: &mut dyn Presenter,
    ) -> EditorResult<DispatchOutcome> {
        let descriptor = descriptor(id)
            .ok_or_else(|| EditorError::InvalidParameter(format!("unknown command {id:?}")))?;
        self.dispatch(document, descriptor, presenter)
    }

    /// Runs one command.
    ///
    /// With nothing loaded, or when the user cancels the parameter prompt, the
    /// document is left alone and no redraw is requested. A failing transform
    /// is returned as an error and nothing is committed.
    pub fn dispatch(
        &self,
        document: &mut Document,
        command: &CommandDescriptor,
        presenter: &mut dyn Presenter,
    ) -> EditorResult<DispatchOutcome> {
        let Some(current) = document.current_image().cloned() else {
            log::debug!("Ignoring {:?}: no image loaded", command.id);
            return Ok(DispatchOutcome::Skipped(SkipReason::NoImageLoaded));
        };

        let param = match command.prompt {
            None => None,
            Some(prompt) => match Self::ask(&prompt, presenter) {
                Some(param) => Some(param),
                None => {
                    log::debug!("Ignoring {:?}: prompt cancelled", command.id);
                    return Ok(DispatchOutcome::Skipped(SkipReason::DialogCancelled));
                }
            },
        };

        let output = (command.transform)(current.pixels(), &self.context, param.as_ref())?;

        if self.commit_policy == CommitPolicy::SkipUnchanged && current.same_pixels(&output) {
            log::debug!("Skipping commit of {:?}: pixels unchanged", command.id);
            return Ok(DispatchOutcome::Skipped(SkipReason::Unchanged));
        }

        log::info!(
            "Applied {} ({}x{} -> {}x{})",
            command.label,
            current.width(),
            current.height(),
            output.width(),
            output.height()
        );
        document.commit(Image::new(output), command.label.trim_end_matches('…'));
        Self::redraw(document, presenter);
        Ok(DispatchOutcome::Applied)
    }

    /// Steps the history back, redrawing only if it moved
    pub fn undo(&self, document: &mut Document, presenter: &mut dyn Presenter) -> DispatchOutcome {
        match document.undo() {
            Ok(snapshot) => {
                log::debug!("Undo to {:?}", snapshot.label);
                presenter.render(&snapshot.image);
                DispatchOutcome::Applied
            }
            Err(error) => {
                log::debug!("Undo ignored: {error}");
                DispatchOutcome::Skipped(error.into())
            }
        }
    }

    /// Steps the history forward, redrawing only if it moved
    pub fn redo(&self, document: &mut Document, presenter: &mut dyn Presenter) -> DispatchOutcome {
        match document.redo() {
            Ok(snapshot) => {
                log::debug!("Redo to {:?}", snapshot.label);
                presenter.render(&snapshot.image);
                DispatchOutcome::Applied
            }
            Err(error) => {
                log::debug!("Redo ignored: {error}");
                DispatchOutcome::Skipped(error.into())
            }
        }
    }

    fn ask(prompt: &ParamPrompt, presenter: &mut dyn Presenter) -> Option<Param> {
        match *prompt {
            ParamPrompt::Float { title, min, max, .. } => {
                let value = presenter.prompt_float(title, min, max)?;
                if !(min..=max).contains(&value) {
                    log::warn!("{title}: {value} is outside {min}..={max}");
                    return None;
                }
                Some(Param::Float(value))
            }
            ParamPrompt::Text { title, validate, .. } => {
                let text = presenter.prompt_string(title)?;
                if let Err(error) = validate(&text) {
                    log::warn!("{title}: {error}");
                    return None;
                }
                Some(Param::Text(text))
            }
        }
    }

    fn redraw(document: &Document, presenter: &mut dyn Presenter) {
        if let Some(image) = document.current_image() {
            presenter.render(image);
        }
    }
}
