mod common;

use common::{MockPresenter, gradient};
use eframe_image_editor::command::{
    COMMANDS, CommandDescriptor, CommandId, DispatchOutcome, Dispatcher, ParamPrompt, SkipReason, TransformContext,
};
use eframe_image_editor::settings::CommitPolicy;
use eframe_image_editor::{Document, EditorError, Image};
use image::DynamicImage;

fn loaded_document() -> Document {
    let mut document = Document::new();
    document.open(gradient(40, 30), None);
    document
}

fn current_id(document: &Document) -> usize {
    document.current_image().unwrap().id()
}

#[test]
fn test_grayscale_undo_crop_scenario() {
    let dispatcher = Dispatcher::default();
    let mut document = loaded_document();
    let original = current_id(&document);
    assert_eq!(document.history().len(), 1);
    assert_eq!(document.history().cursor(), Some(0));

    let mut presenter = MockPresenter::new();
    let outcome = dispatcher
        .dispatch_id(&mut document, CommandId::Grayscale, &mut presenter)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Applied);
    assert_eq!(document.history().len(), 2);
    assert_eq!(document.history().cursor(), Some(1));
    let gray = current_id(&document);
    assert_eq!(presenter.rendered, vec![gray]);

    assert!(dispatcher.undo(&mut document, &mut presenter).is_applied());
    assert_eq!(current_id(&document), original);

    presenter.strings.push_back("5, 5, 20, 10".to_owned());
    let outcome = dispatcher
        .dispatch_id(&mut document, CommandId::Crop, &mut presenter)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Applied);
    assert_eq!(document.history().len(), 2);
    assert_eq!(document.history().cursor(), Some(1));
    let cropped = document.current_image().unwrap();
    assert_eq!((cropped.width(), cropped.height()), (20, 10));

    let labels: Vec<&str> = document.history().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Open", "Crop"]);

    let rendered_before = presenter.rendered.len();
    assert_eq!(
        dispatcher.redo(&mut document, &mut presenter),
        DispatchOutcome::Skipped(SkipReason::NoNewerVersion)
    );
    assert_eq!(presenter.rendered.len(), rendered_before);
}

#[test]
fn test_commands_without_image_do_nothing() {
    let dispatcher = Dispatcher::default();
    let mut document = Document::new();

    for command in COMMANDS {
        let mut presenter = answering_defaults(command);
        let outcome = dispatcher.dispatch(&mut document, command, &mut presenter).unwrap();
        assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::NoImageLoaded), "{:?}", command.id);
        assert!(presenter.rendered.is_empty(), "{:?}", command.id);
        assert!(presenter.prompts.is_empty(), "{:?}", command.id);
    }
    assert!(document.history().is_empty());

    let mut presenter = MockPresenter::new();
    assert_eq!(
        dispatcher.undo(&mut document, &mut presenter),
        DispatchOutcome::Skipped(SkipReason::NoPriorVersion)
    );
    assert!(presenter.rendered.is_empty());
}

/// Presenter answering the command's prompt with its default value or hint
fn answering_defaults(command: &CommandDescriptor) -> MockPresenter {
    match command.prompt {
        None => MockPresenter::new(),
        Some(ParamPrompt::Float { default, .. }) => MockPresenter::answering_float(default),
        Some(ParamPrompt::Text { hint, .. }) => MockPresenter::answering_text(hint),
    }
}

/// Output size of `command` run with its default answer on a `width` x `height` image
fn expected_size(command: CommandId, width: u32, height: u32) -> (u32, u32) {
    match command {
        CommandId::Rotate90 | CommandId::Rotate270 => (height, width),
        CommandId::Resize => (800, 600),
        CommandId::Scale => (width / 2, height / 2),
        CommandId::Crop => (100, 100),
        CommandId::Border => (width + 20, height + 20),
        _ => (width, height),
    }
}

#[test]
fn test_every_command_applies_to_every_pixel_format() {
    let (width, height) = (160, 120);
    let base = gradient(width, height);
    let formats = [
        ("Rgb8", base.pixels().clone()),
        ("Rgba8", DynamicImage::ImageRgba8(base.pixels().to_rgba8())),
        ("Luma16", DynamicImage::ImageLuma16(base.pixels().to_luma16())),
        ("Rgba32F", DynamicImage::ImageRgba32F(base.pixels().to_rgba32f())),
    ];
    let dispatcher = Dispatcher::default();

    for (format, pixels) in formats {
        for command in COMMANDS {
            let mut document = Document::new();
            document.open(Image::new(pixels.clone()), None);
            let mut presenter = answering_defaults(command);

            let outcome = dispatcher
                .dispatch(&mut document, command, &mut presenter)
                .unwrap_or_else(|err| panic!("{:?} on {format}: {err}", command.id));
            assert_eq!(outcome, DispatchOutcome::Applied, "{:?} on {format}", command.id);
            assert_eq!(document.history().len(), 2, "{:?} on {format}", command.id);

            let output = document.current_image().unwrap();
            assert_eq!(
                (output.width(), output.height()),
                expected_size(command.id, width, height),
                "{:?} on {format}",
                command.id
            );
            assert_eq!(presenter.rendered, vec![output.id()], "{:?} on {format}", command.id);
        }
    }
}

#[test]
fn test_drawing_far_off_canvas_is_an_error_not_a_crash() {
    let dispatcher = Dispatcher::default();
    let cases = [
        (CommandId::DrawRectangle, "2147483000, 0, 1000, 10"),
        (CommandId::DrawEllipse, "2147483000, 0, 1000, 10"),
        (CommandId::DrawLine, "-2147483648, 0, 2147483647, 5"),
    ];

    for (id, answer) in cases {
        let mut document = Document::new();
        document.open(gradient(20, 20), None);
        let mut presenter = MockPresenter::answering_text(answer);

        let result = dispatcher.dispatch_id(&mut document, id, &mut presenter);
        assert!(matches!(result, Err(EditorError::InvalidParameter(_))), "{id:?}: {result:?}");
        assert_eq!(document.history().len(), 1);
        assert!(presenter.rendered.is_empty());
    }
}

#[test]
fn test_cancelled_prompt_leaves_history_alone() {
    let dispatcher = Dispatcher::default();
    let mut document = loaded_document();
    let before = current_id(&document);
    let mut presenter = MockPresenter::new();

    let outcome = dispatcher
        .dispatch_id(&mut document, CommandId::Resize, &mut presenter)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::DialogCancelled));
    assert_eq!(presenter.prompts, vec!["New size".to_owned()]);
    assert_eq!(document.history().len(), 1);
    assert_eq!(current_id(&document), before);
    assert!(presenter.rendered.is_empty());
}

#[test]
fn test_invalid_answers_count_as_cancelled() {
    let dispatcher = Dispatcher::default();
    let mut document = loaded_document();

    let mut presenter = MockPresenter::answering_text("not a size");
    let outcome = dispatcher
        .dispatch_id(&mut document, CommandId::Resize, &mut presenter)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::DialogCancelled));

    let mut presenter = MockPresenter::answering_float(99.0);
    let outcome = dispatcher
        .dispatch_id(&mut document, CommandId::Gamma, &mut presenter)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::DialogCancelled));
    assert_eq!(document.history().len(), 1);
}

#[test]
fn test_failing_transform_is_reported_and_not_committed() {
    let dispatcher = Dispatcher::default();
    let mut document = loaded_document();
    let mut presenter = MockPresenter::answering_text("30, 20, 50, 50");

    let result = dispatcher.dispatch_id(&mut document, CommandId::Crop, &mut presenter);
    assert!(matches!(result, Err(EditorError::InvalidParameter(_))));
    assert_eq!(document.history().len(), 1);
    assert!(presenter.rendered.is_empty());
}

#[test]
fn test_unchanged_output_commits_by_default() {
    let dispatcher = Dispatcher::default();
    let mut document = loaded_document();
    let mut presenter = MockPresenter::answering_text("40x30");

    let outcome = dispatcher
        .dispatch_id(&mut document, CommandId::Resize, &mut presenter)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Applied);
    assert_eq!(document.history().len(), 2);
}

#[test]
fn test_skip_unchanged_policy_skips_noop_edits() {
    let dispatcher = Dispatcher::new(CommitPolicy::SkipUnchanged, TransformContext::default());
    let mut document = loaded_document();
    let mut presenter = MockPresenter::answering_text("40x30");

    let outcome = dispatcher
        .dispatch_id(&mut document, CommandId::Resize, &mut presenter)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::Unchanged));
    assert_eq!(document.history().len(), 1);
    assert!(presenter.rendered.is_empty());

    // Flipping twice gets back the original, but each flip is a real change
    for _ in 0..2 {
        let outcome = dispatcher
            .dispatch_id(&mut document, CommandId::FlipHorizontal, &mut presenter)
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Applied);
    }
    assert_eq!(document.history().len(), 3);
}

#[test]
fn test_undo_redo_render_the_restored_snapshot() {
    let dispatcher = Dispatcher::default();
    let mut document = loaded_document();
    let original = current_id(&document);
    let mut presenter = MockPresenter::new();

    dispatcher
        .dispatch_id(&mut document, CommandId::Invert, &mut presenter)
        .unwrap();
    let inverted = current_id(&document);

    dispatcher.undo(&mut document, &mut presenter);
    dispatcher.redo(&mut document, &mut presenter);
    assert_eq!(presenter.rendered, vec![inverted, original, inverted]);
}

#[test]
fn test_draw_uses_context_color() {
    let context = TransformContext {
        draw_color: image::Rgba([0, 255, 0, 255]),
    };
    let dispatcher = Dispatcher::new(CommitPolicy::Always, context);
    let mut document = loaded_document();
    let mut presenter = MockPresenter::answering_text("0, 0, 10, 10");

    dispatcher
        .dispatch_id(&mut document, CommandId::DrawRectangle, &mut presenter)
        .unwrap();
    let pixels = document.current_image().unwrap().pixels().to_rgba8();
    assert_eq!(pixels.get_pixel(0, 0).0, [0, 255, 0, 255]);
}

#[test]
fn test_document_dirty_tracking() {
    let dispatcher = Dispatcher::default();
    let mut document = loaded_document();
    let mut presenter = MockPresenter::new();
    assert!(!document.is_dirty());

    dispatcher
        .dispatch_id(&mut document, CommandId::Rotate90, &mut presenter)
        .unwrap();
    assert!(document.is_dirty());

    dispatcher.undo(&mut document, &mut presenter);
    assert!(!document.is_dirty());
}
