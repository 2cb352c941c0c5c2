use image::{DynamicImage, Rgba};

use super::params::{Param, ParamPrompt, parse_ints, parse_size, parse_uints};
use crate::error::{EditorError, EditorResult};
use crate::transform;

/// Menus the editing commands are grouped under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Image,
    Filter,
    Adjust,
    Draw,
}

impl Menu {
    pub const ALL: [Menu; 4] = [Menu::Image, Menu::Filter, Menu::Adjust, Menu::Draw];

    pub fn label(&self) -> &'static str {
        match self {
            Menu::Image => "Image",
            Menu::Filter => "Filter",
            Menu::Adjust => "Adjust",
            Menu::Draw => "Draw",
        }
    }
}

/// Every editing command the dispatcher knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Grayscale,
    Invert,
    FlipHorizontal,
    FlipVertical,
    Rotate90,
    Rotate180,
    Rotate270,
    RotateBy,
    Resize,
    Scale,
    Crop,
    Border,
    Blur,
    Sharpen,
    FindEdges,
    Emboss,
    Smooth,
    Brightness,
    Contrast,
    Saturation,
    Gamma,
    DrawRectangle,
    DrawEllipse,
    DrawLine,
}

/// Inputs a transform may need besides the image and its parameter
#[derive(Debug, Clone, Copy)]
pub struct TransformContext {
    /// Ink for drawing primitives and borders
    pub draw_color: Rgba<u8>,
}

impl Default for TransformContext {
    fn default() -> Self {
        Self {
            draw_color: Rgba([255, 0, 0, 255]),
        }
    }
}

pub type TransformFn = fn(&DynamicImage, &TransformContext, Option<&Param>) -> EditorResult<DynamicImage>;

/// A table entry tying a command to its menu, prompt and transform
#[derive(Clone, Copy)]
pub struct CommandDescriptor {
    pub id: CommandId,
    pub label: &'static str,
    pub menu: Menu,
    pub prompt: Option<ParamPrompt>,
    pub transform: TransformFn,
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("menu", &self.menu)
            .field("prompt", &self.prompt)
            .finish()
    }
}

fn required(param: Option<&Param>) -> EditorResult<&Param> {
    param.ok_or_else(|| EditorError::InvalidParameter("missing parameter".to_owned()))
}

fn float(param: Option<&Param>) -> EditorResult<f32> {
    required(param)?.as_float()
}

fn text(param: Option<&Param>) -> EditorResult<&str> {
    required(param)?.as_text()
}

fn validate_size(text: &str) -> EditorResult<()> {
    parse_size(text).map(|_| ())
}

fn validate_rect(text: &str) -> EditorResult<()> {
    let [_, _, width, height] = parse_ints::<4>(text)?;
    if width <= 0 || height <= 0 {
        return Err(EditorError::InvalidParameter("width and height must be positive".to_owned()));
    }
    Ok(())
}

fn validate_crop(text: &str) -> EditorResult<()> {
    let [_, _, width, height] = parse_uints::<4>(text)?;
    if width == 0 || height == 0 {
        return Err(EditorError::InvalidParameter("width and height must be positive".to_owned()));
    }
    Ok(())
}

fn validate_ellipse(text: &str) -> EditorResult<()> {
    let [_, _, radius_x, radius_y] = parse_ints::<4>(text)?;
    if radius_x <= 0 || radius_y <= 0 {
        return Err(EditorError::InvalidParameter("radii must be positive".to_owned()));
    }
    Ok(())
}

fn validate_line(text: &str) -> EditorResult<()> {
    parse_ints::<4>(text).map(|_| ())
}

const fn simple(
    id: CommandId,
    label: &'static str,
    menu: Menu,
    transform: TransformFn,
) -> CommandDescriptor {
    CommandDescriptor {
        id,
        label,
        menu,
        prompt: None,
        transform,
    }
}

const fn prompted(
    id: CommandId,
    label: &'static str,
    menu: Menu,
    prompt: ParamPrompt,
    transform: TransformFn,
) -> CommandDescriptor {
    CommandDescriptor {
        id,
        label,
        menu,
        prompt: Some(prompt),
        transform,
    }
}

/// Every command, in menu order
pub static COMMANDS: &[CommandDescriptor] = &[
    // Image
    simple(CommandId::Grayscale, "Grayscale", Menu::Image, |img, _, _| {
        Ok(transform::grayscale(img))
    }),
    simple(CommandId::Invert, "Invert Colors", Menu::Image, |img, _, _| {
        Ok(transform::invert(img))
    }),
    simple(CommandId::FlipHorizontal, "Flip Horizontal", Menu::Image, |img, _, _| {
        Ok(transform::flip_horizontal(img))
    }),
    simple(CommandId::FlipVertical, "Flip Vertical", Menu::Image, |img, _, _| {
        Ok(transform::flip_vertical(img))
    }),
    simple(CommandId::Rotate90, "Rotate 90°", Menu::Image, |img, _, _| {
        Ok(transform::rotate90(img))
    }),
    simple(CommandId::Rotate180, "Rotate 180°", Menu::Image, |img, _, _| {
        Ok(transform::rotate180(img))
    }),
    simple(CommandId::Rotate270, "Rotate 270°", Menu::Image, |img, _, _| {
        Ok(transform::rotate270(img))
    }),
    prompted(
        CommandId::RotateBy,
        "Rotate by Angle…",
        Menu::Image,
        ParamPrompt::Float {
            title: "Rotation in degrees (clockwise)",
            min: -360.0,
            max: 360.0,
            default: 15.0,
        },
        |img, _, param| Ok(transform::rotate_by(img, float(param)?)),
    ),
    prompted(
        CommandId::Resize,
        "Resize…",
        Menu::Image,
        ParamPrompt::Text {
            title: "New size",
            hint: "800x600",
            validate: validate_size,
        },
        |img, _, param| {
            let (width, height) = parse_size(text(param)?)?;
            transform::resize(img, width, height)
        },
    ),
    prompted(
        CommandId::Scale,
        "Scale…",
        Menu::Image,
        ParamPrompt::Float {
            title: "Scale in percent",
            min: 1.0,
            max: 1000.0,
            default: 50.0,
        },
        |img, _, param| transform::scale(img, float(param)?),
    ),
    prompted(
        CommandId::Crop,
        "Crop…",
        Menu::Image,
        ParamPrompt::Text {
            title: "Crop rectangle (x, y, width, height)",
            hint: "0, 0, 100, 100",
            validate: validate_crop,
        },
        |img, _, param| {
            let [x, y, width, height] = parse_uints::<4>(text(param)?)?;
            transform::crop(img, x, y, width, height)
        },
    ),
    prompted(
        CommandId::Border,
        "Add Border…",
        Menu::Image,
        ParamPrompt::Float {
            title: "Border width in pixels",
            min: 1.0,
            max: 500.0,
            default: 10.0,
        },
        |img, ctx, param| transform::border(img, float(param)?.round() as u32, ctx.draw_color),
    ),
    // Filter
    prompted(
        CommandId::Blur,
        "Blur…",
        Menu::Filter,
        ParamPrompt::Float {
            title: "Blur radius (sigma)",
            min: 0.1,
            max: 50.0,
            default: 2.0,
        },
        |img, _, param| Ok(transform::blur(img, float(param)?)),
    ),
    simple(CommandId::Sharpen, "Sharpen", Menu::Filter, |img, _, _| {
        Ok(transform::sharpen(img))
    }),
    simple(CommandId::FindEdges, "Find Edges", Menu::Filter, |img, _, _| {
        Ok(transform::find_edges(img))
    }),
    simple(CommandId::Emboss, "Emboss", Menu::Filter, |img, _, _| {
        Ok(transform::emboss(img))
    }),
    simple(CommandId::Smooth, "Smooth", Menu::Filter, |img, _, _| {
        Ok(transform::smooth(img))
    }),
    // Adjust
    prompted(
        CommandId::Brightness,
        "Brightness…",
        Menu::Adjust,
        ParamPrompt::Float {
            title: "Brightness factor (1.0 = unchanged)",
            min: 0.0,
            max: 4.0,
            default: 1.2,
        },
        |img, _, param| Ok(transform::brightness(img, float(param)?)),
    ),
    prompted(
        CommandId::Contrast,
        "Contrast…",
        Menu::Adjust,
        ParamPrompt::Float {
            title: "Contrast factor (1.0 = unchanged)",
            min: 0.0,
            max: 4.0,
            default: 1.2,
        },
        |img, _, param| Ok(transform::contrast(img, float(param)?)),
    ),
    prompted(
        CommandId::Saturation,
        "Saturation…",
        Menu::Adjust,
        ParamPrompt::Float {
            title: "Saturation factor (1.0 = unchanged)",
            min: 0.0,
            max: 4.0,
            default: 1.2,
        },
        |img, _, param| Ok(transform::saturation(img, float(param)?)),
    ),
    prompted(
        CommandId::Gamma,
        "Gamma…",
        Menu::Adjust,
        ParamPrompt::Float {
            title: "Gamma",
            min: 0.1,
            max: 5.0,
            default: 1.0,
        },
        |img, _, param| transform::gamma(img, float(param)?),
    ),
    // Draw
    prompted(
        CommandId::DrawRectangle,
        "Rectangle…",
        Menu::Draw,
        ParamPrompt::Text {
            title: "Rectangle (x, y, width, height)",
            hint: "10, 10, 100, 50",
            validate: validate_rect,
        },
        |img, ctx, param| {
            let [x, y, width, height] = parse_ints::<4>(text(param)?)?;
            let (width, height) = (width.max(0) as u32, height.max(0) as u32);
            transform::draw_rectangle(img, x, y, width, height, ctx.draw_color)
        },
    ),
    prompted(
        CommandId::DrawEllipse,
        "Ellipse…",
        Menu::Draw,
        ParamPrompt::Text {
            title: "Ellipse (center x, center y, radius x, radius y)",
            hint: "100, 100, 40, 20",
            validate: validate_ellipse,
        },
        |img, ctx, param| {
            let [cx, cy, rx, ry] = parse_ints::<4>(text(param)?)?;
            transform::draw_ellipse(img, (cx, cy), rx, ry, ctx.draw_color)
        },
    ),
    prompted(
        CommandId::DrawLine,
        "Line…",
        Menu::Draw,
        ParamPrompt::Text {
            title: "Line (x0, y0, x1, y1)",
            hint: "0, 0, 100, 100",
            validate: validate_line,
        },
        |img, ctx, param| {
            let [x0, y0, x1, y1] = parse_ints::<4>(text(param)?)?;
            transform::draw_line(img, (x0, y0), (x1, y1), ctx.draw_color)
        },
    ),
];

/// Looks up the descriptor for `id`
pub fn descriptor(id: CommandId) -> Option<&'static CommandDescriptor> {
    COMMANDS.iter().find(|descriptor| descriptor.id == id)
}

/// Descriptors shown under `menu`, in table order
pub fn in_menu(menu: Menu) -> impl Iterator<Item = &'static CommandDescriptor> {
    COMMANDS.iter().filter(move |descriptor| descriptor.menu == menu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_menu_has_commands() {
        for menu in Menu::ALL {
            assert!(in_menu(menu).count() > 0, "{} is empty", menu.label());
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = COMMANDS.iter().map(|descriptor| descriptor.id).collect();
        assert_eq!(ids.len(), COMMANDS.len());
        assert_eq!(descriptor(CommandId::Gamma).map(|d| d.label), Some("Gamma…"));
    }

    #[test]
    fn test_prompted_commands_reject_missing_parameter() {
        let img = DynamicImage::new_rgb8(4, 4);
        let ctx = TransformContext::default();
        for descriptor in COMMANDS.iter().filter(|descriptor| descriptor.prompt.is_some()) {
            assert!(
                (descriptor.transform)(&img, &ctx, None).is_err(),
                "{:?} accepted a missing parameter",
                descriptor.id
            );
        }
    }

    #[test]
    fn test_text_validators() {
        assert!(validate_crop("0,0,10,10").is_ok());
        assert!(validate_crop("-1,0,10,10").is_err());
        assert!(validate_rect("-5,-5,10,10").is_ok());
        assert!(validate_rect("0,0,0,10").is_err());
        assert!(validate_ellipse("5,5,0,1").is_err());
    }
}
