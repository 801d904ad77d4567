//! Operation commands.
//!
//! An [`Operation`] is one of the registry's transforms as a value. A
//! [`Command`] binds it to a source and destination name at construction and
//! forwards to the matching [`Registry`] method when executed. Construction
//! never fails; execution propagates whatever the registry returns.
//!
//! Every operation has a literal verb (`"red-component"`, `"horizontal-flip"`,
//! `"brighten"`, ...) used by the script interpreter and the `apply`
//! subcommand. [`VERBS`] lists them with their usage line for the menu.

use crate::imaging::{Component, ImageBackend};
use crate::registry::{self, Registry};
use std::fmt;

/// A registry transform, with its parameter where it takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FlipHorizontal,
    FlipVertical,
    /// Add the delta to every channel, clamped to `0..=255`.
    Brighten(i32),
    Component(Component),
    Sepia,
    Greyscale,
    Blur,
    Sharpen,
}

/// Usage line and description for one verb.
#[derive(Debug, Clone, Copy)]
pub struct Verb {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
}

const fn verb(name: &'static str, usage: &'static str, help: &'static str) -> Verb {
    Verb { name, usage, help }
}

/// Transform verbs in menu order.
pub const VERBS: &[Verb] = &[
    verb("red-component", "image-name dest-image-name", "greyscale image from the red channel"),
    verb("green-component", "image-name dest-image-name", "greyscale image from the green channel"),
    verb("blue-component", "image-name dest-image-name", "greyscale image from the blue channel"),
    verb("intensity", "image-name dest-image-name", "greyscale image from the channel mean"),
    verb("luma", "image-name dest-image-name", "greyscale image from weighted luma"),
    verb("value", "image-name dest-image-name", "greyscale image from the largest channel"),
    verb("horizontal-flip", "image-name dest-image-name", "reverse the row order"),
    verb("vertical-flip", "image-name dest-image-name", "reverse each row"),
    verb("brighten", "increment image-name dest-image-name", "brighten or darken"),
    verb("sepia", "image-name dest-image-name", "sepia tone"),
    verb("greyscale", "image-name dest-image-name", "greyscale via the colour matrix"),
    verb("blur", "image-name dest-image-name", "3x3 Gaussian blur"),
    verb("sharpen", "image-name dest-image-name", "5x5 sharpen"),
];

impl Operation {
    /// Parse a verb. `brighten` needs `increment`; every other verb ignores it.
    ///
    /// Returns `None` for an unknown verb.
    pub fn from_verb(verb: &str, increment: Option<i32>) -> Option<Result<Self, MissingIncrement>> {
        let op = match verb {
            "horizontal-flip" => Self::FlipHorizontal,
            "vertical-flip" => Self::FlipVertical,
            "brighten" => return Some(increment.map(Self::Brighten).ok_or(MissingIncrement)),
            "red-component" => Self::Component(Component::Red),
            "green-component" => Self::Component(Component::Green),
            "blue-component" => Self::Component(Component::Blue),
            "intensity" => Self::Component(Component::Intensity),
            "luma" => Self::Component(Component::Luma),
            "value" => Self::Component(Component::Value),
            "sepia" => Self::Sepia,
            "greyscale" => Self::Greyscale,
            "blur" => Self::Blur,
            "sharpen" => Self::Sharpen,
            _ => return None,
        };
        Some(Ok(op))
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::FlipHorizontal => "horizontal-flip",
            Self::FlipVertical => "vertical-flip",
            Self::Brighten(_) => "brighten",
            Self::Component(Component::Red) => "red-component",
            Self::Component(Component::Green) => "green-component",
            Self::Component(Component::Blue) => "blue-component",
            Self::Component(Component::Intensity) => "intensity",
            Self::Component(Component::Luma) => "luma",
            Self::Component(Component::Value) => "value",
            Self::Sepia => "sepia",
            Self::Greyscale => "greyscale",
            Self::Blur => "blur",
            Self::Sharpen => "sharpen",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brighten(delta) => write!(f, "brighten {delta}"),
            other => f.write_str(other.verb()),
        }
    }
}

/// `brighten` was named without an increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingIncrement;

/// An operation bound to its source and destination names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub operation: Operation,
    pub source: String,
    pub dest: String,
}

impl Command {
    pub fn new(operation: Operation, source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            operation,
            source: source.into(),
            dest: dest.into(),
        }
    }

    /// Run the bound operation against `registry`.
    pub fn execute<B: ImageBackend>(&self, registry: &mut Registry<B>) -> registry::Result<()> {
        let (src, dst) = (self.source.as_str(), self.dest.as_str());
        match self.operation {
            Operation::FlipHorizontal => registry.flip_horizontal(src, dst),
            Operation::FlipVertical => registry.flip_vertical(src, dst),
            Operation::Brighten(delta) => registry.brighten(delta, src, dst),
            Operation::Component(component) => registry.component(component, src, dst),
            Operation::Sepia => registry.sepia(src, dst),
            Operation::Greyscale => registry.greyscale(src, dst),
            Operation::Blur => registry.blur(src, dst),
            Operation::Sharpen => registry.sharpen(src, dst),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.operation, self.source, self.dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Pixel;
    use crate::imaging::backend::tests::MockBackend;
    use crate::registry::RegistryError;
    use crate::test_helpers::{assert_rows, sample_image};

    #[test]
    fn every_listed_verb_parses_and_round_trips() {
        for v in VERBS {
            let op = Operation::from_verb(v.name, Some(5)).unwrap().unwrap();
            assert_eq!(op.verb(), v.name);
        }
    }

    #[test]
    fn brighten_requires_increment() {
        assert_eq!(Operation::from_verb("brighten", None), Some(Err(MissingIncrement)));
        assert_eq!(
            Operation::from_verb("brighten", Some(-7)),
            Some(Ok(Operation::Brighten(-7)))
        );
    }

    #[test]
    fn unknown_verb_is_none() {
        assert_eq!(Operation::from_verb("emboss", None), None);
        assert_eq!(Operation::from_verb("Blur", None), None);
    }

    #[test]
    fn display_shows_verb_and_names() {
        let cmd = Command::new(Operation::Brighten(10), "a", "b");
        assert_eq!(cmd.to_string(), "brighten 10 a b");
        let cmd = Command::new(Operation::Component(Component::Luma), "a", "b");
        assert_eq!(cmd.to_string(), "luma a b");
    }

    #[test]
    fn execute_forwards_to_registry() {
        let mut registry = Registry::with_backend(MockBackend::new());
        registry.put("img", sample_image());

        Command::new(Operation::Component(Component::Red), "img", "red")
            .execute(&mut registry)
            .unwrap();
        let red = registry.get_image("red").unwrap();
        assert_eq!(red.get_pixel_at(0, 1).unwrap(), Pixel::rgb(4, 4, 4));

        Command::new(Operation::FlipVertical, "img", "img")
            .execute(&mut registry)
            .unwrap();
        assert_rows(
            &registry.get_image("img").unwrap(),
            &[
                &[(7, 8, 9), (4, 5, 6), (1, 2, 3)],
                &[(17, 18, 19), (14, 15, 16), (11, 12, 13)],
                &[(27, 28, 29), (24, 25, 26), (21, 22, 23)],
            ],
        );
    }

    #[test]
    fn execute_propagates_unknown_image() {
        let mut registry = Registry::with_backend(MockBackend::new());
        let err = Command::new(Operation::Sharpen, "missing", "out")
            .execute(&mut registry)
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownImage(_)));
    }
}
