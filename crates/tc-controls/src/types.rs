//! Mode, space and handle identifiers

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Which transform a drag applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl Mode {
    pub fn all() -> &'static [Mode] {
        &[Mode::Translate, Mode::Rotate, Mode::Scale]
    }
}

/// Coordinate space drag directions are resolved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Space {
    #[default]
    World,
    Local,
}

/// Handle identifier: a single axis, an axis pair or a free handle.
///
/// The variant names spell the degrees of freedom they touch; `E` is the
/// view-aligned ring and `XYZE` the free trackball rotation. `XYZX`,
/// `XYZY` and `XYZZ` are the uniform scale cubes at the axis tips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    XY,
    YZ,
    XZ,
    XYZ,
    E,
    XYZE,
    XYZX,
    XYZY,
    XYZZ,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::XY => "XY",
            Axis::YZ => "YZ",
            Axis::XZ => "XZ",
            Axis::XYZ => "XYZ",
            Axis::E => "E",
            Axis::XYZE => "XYZE",
            Axis::XYZX => "XYZX",
            Axis::XYZY => "XYZY",
            Axis::XYZZ => "XYZZ",
        }
    }

    /// True if the identifier names the given letter (`X`, `Y`, `Z` or `E`)
    pub fn contains(&self, letter: char) -> bool {
        self.as_str().contains(letter)
    }

    /// True for the three uniform-scale identifiers and the free translate handle
    pub fn is_uniform(&self) -> bool {
        self.as_str().contains("XYZ")
    }

    /// The letter of single-letter identifiers, the view ring included
    pub fn letter(&self) -> Option<char> {
        match self {
            Axis::X => Some('X'),
            Axis::Y => Some('Y'),
            Axis::Z => Some('Z'),
            Axis::E => Some('E'),
            _ => None,
        }
    }

    /// Unit vector for single-axis identifiers
    pub fn unit(&self) -> Option<Vec3> {
        match self {
            Axis::X => Some(Vec3::X),
            Axis::Y => Some(Vec3::Y),
            Axis::Z => Some(Vec3::Z),
            _ => None,
        }
    }

    /// Keep the components this identifier names, replacing the rest
    pub fn mask(&self, value: Vec3, unnamed: f32) -> Vec3 {
        Vec3::new(
            if self.contains('X') { value.x } else { unnamed },
            if self.contains('Y') { value.y } else { unnamed },
            if self.contains('Z') { value.z } else { unnamed },
        )
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Space actually used for a drag.
///
/// Scale always works in the object's own frame; the free handles always
/// work in world space; everything else follows the configured space.
pub fn resolve_space(mode: Mode, axis: Axis, configured: Space) -> Space {
    if mode == Mode::Scale {
        Space::Local
    } else if matches!(axis, Axis::E | Axis::XYZE | Axis::XYZ) {
        Space::World
    } else {
        configured
    }
}

/// Pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Pointer sample in normalized device coordinates.
///
/// `button` is set for press and release samples and `None` for moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub ndc: Vec2,
    pub button: Option<PointerButton>,
}

/// Screen rectangle of the viewport receiving pointer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Pointer {
    pub fn new(x: f32, y: f32, button: Option<PointerButton>) -> Self {
        Self {
            ndc: Vec2::new(x, y),
            button,
        }
    }

    /// Move sample (no button)
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(x, y, None)
    }

    /// Primary button press/release sample
    pub fn primary(x: f32, y: f32) -> Self {
        Self::new(x, y, Some(PointerButton::Primary))
    }

    /// Map client pixel coordinates into normalized device coordinates.
    ///
    /// Under pointer lock the cursor is pinned to the viewport center.
    pub fn from_client(
        client: Vec2,
        rect: ViewportRect,
        button: Option<PointerButton>,
        pointer_locked: bool,
    ) -> Self {
        if pointer_locked {
            return Self::new(0.0, 0.0, button);
        }
        let width = rect.width.max(1.0);
        let height = rect.height.max(1.0);
        Self::new(
            (client.x - rect.left) / width * 2.0 - 1.0,
            -(client.y - rect.top) / height * 2.0 + 1.0,
            button,
        )
    }
}

/// Device that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerType {
    Mouse,
    Pen,
    Touch,
}

/// Phase of a raw pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Raw pointer event as delivered by the windowing layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub pointer_type: PointerType,
    pub pointer: Pointer,
}

impl PointerInput {
    pub fn mouse(phase: PointerPhase, pointer: Pointer) -> Self {
        Self {
            phase,
            pointer_type: PointerType::Mouse,
            pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolve_space() {
        assert_eq!(resolve_space(Mode::Scale, Axis::X, Space::World), Space::Local);
        assert_eq!(resolve_space(Mode::Rotate, Axis::E, Space::Local), Space::World);
        assert_eq!(resolve_space(Mode::Translate, Axis::XYZ, Space::Local), Space::World);
        assert_eq!(resolve_space(Mode::Translate, Axis::XY, Space::Local), Space::Local);
    }

    #[test]
    fn test_single_letters() {
        assert_eq!(Axis::E.letter(), Some('E'));
        assert_eq!(Axis::Y.letter(), Some('Y'));
        assert_eq!(Axis::XY.letter(), None);
        assert_eq!(Axis::XYZE.letter(), None);
    }

    #[test]
    fn test_mask() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Axis::X.mask(v, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(Axis::XZ.mask(v, 1.0), Vec3::new(1.0, 1.0, 3.0));
        assert_eq!(Axis::XYZ.mask(v, 0.0), v);
        assert_eq!(Axis::E.mask(v, 0.0), Vec3::ZERO);
    }

    #[test]
    fn test_pointer_from_client() {
        let rect = ViewportRect {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 100.0,
        };
        let p = Pointer::from_client(Vec2::new(200.0, 100.0), rect, None, false);
        assert_relative_eq!(p.ndc.x, 0.0);
        assert_relative_eq!(p.ndc.y, 0.0);

        let p = Pointer::from_client(Vec2::new(100.0, 50.0), rect, None, false);
        assert_relative_eq!(p.ndc.x, -1.0);
        assert_relative_eq!(p.ndc.y, 1.0);

        let locked = Pointer::from_client(Vec2::new(5.0, 5.0), rect, None, true);
        assert_eq!(locked.ndc, Vec2::ZERO);
    }
}
