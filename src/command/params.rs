use crate::error::{EditorError, EditorResult};

/// A value collected from the user before a command runs
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Float(f32),
    Text(String),
}

impl Param {
    pub fn as_float(&self) -> EditorResult<f32> {
        match self {
            Param::Float(value) => Ok(*value),
            Param::Text(text) => Err(EditorError::InvalidParameter(format!(
                "expected a number, got {text:?}"
            ))),
        }
    }

    pub fn as_text(&self) -> EditorResult<&str> {
        match self {
            Param::Text(text) => Ok(text),
            Param::Float(value) => Err(EditorError::InvalidParameter(format!(
                "expected text, got {value}"
            ))),
        }
    }
}

/// How a command asks for its parameter
#[derive(Debug, Clone, Copy)]
pub enum ParamPrompt {
    /// A number in `min..=max`, pre-filled with `default`
    Float {
        title: &'static str,
        min: f32,
        max: f32,
        default: f32,
    },
    /// Free text, checked by `validate` before the command is allowed to run
    Text {
        title: &'static str,
        hint: &'static str,
        validate: fn(&str) -> EditorResult<()>,
    },
}

impl ParamPrompt {
    pub fn title(&self) -> &'static str {
        match self {
            ParamPrompt::Float { title, .. } | ParamPrompt::Text { title, .. } => title,
        }
    }
}

/// Parses `"WIDTHxHEIGHT"`, e.g. `800x600`
pub fn parse_size(text: &str) -> EditorResult<(u32, u32)> {
    let invalid = || EditorError::InvalidParameter(format!("expected WIDTHxHEIGHT, got {text:?}"));
    let (width, height) = text
        .trim()
        .split_once(['x', 'X', '*'])
        .ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Parses exactly `N` integers separated by commas or whitespace
pub fn parse_ints<const N: usize>(text: &str) -> EditorResult<[i32; N]> {
    let invalid = || EditorError::InvalidParameter(format!("expected {N} whole numbers, got {text:?}"));
    let values = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i32>().map_err(|_| invalid()))
        .collect::<EditorResult<Vec<_>>>()?;
    values.try_into().map_err(|_| invalid())
}

/// Like [`parse_ints`] but rejects negative values
pub fn parse_uints<const N: usize>(text: &str) -> EditorResult<[u32; N]> {
    let values = parse_ints::<N>(text)?;
    let mut out = [0u32; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = u32::try_from(value).map_err(|_| {
            EditorError::InvalidParameter(format!("expected non-negative numbers, got {text:?}"))
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("800x600").unwrap(), (800, 600));
        assert_eq!(parse_size(" 32 X 16 ").unwrap(), (32, 16));
        assert!(parse_size("800").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn test_parse_ints() {
        assert_eq!(parse_ints::<4>("1, 2 3,4").unwrap(), [1, 2, 3, 4]);
        assert_eq!(parse_ints::<2>("-5,7").unwrap(), [-5, 7]);
        assert!(parse_ints::<4>("1,2,3").is_err());
        assert!(parse_ints::<2>("1,2,3").is_err());
        assert!(parse_ints::<2>("1,b").is_err());
    }

    #[test]
    fn test_parse_uints_rejects_negative() {
        assert_eq!(parse_uints::<2>("3,4").unwrap(), [3, 4]);
        assert!(parse_uints::<2>("-3,4").is_err());
    }

    #[test]
    fn test_param_accessors() {
        assert_eq!(Param::Float(1.5).as_float().unwrap(), 1.5);
        assert!(Param::Float(1.5).as_text().is_err());
        assert_eq!(Param::Text("a".into()).as_text().unwrap(), "a");
    }
}
