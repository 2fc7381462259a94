//! Handle layouts for the three modes
//!
//! Every table lists `(name, part)` pairs in the gizmo's unit frame, where
//! the arrows reach out to 1.0. Picker tables hold the invisible, slightly
//! larger volumes the pointer is tested against.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

use super::handles::HandleName::Axis as A;
use super::handles::{Handle, HandleMaterial, HandleName, HandleShape, HandleTag, Part};
use crate::config::AppearanceConfig;
use crate::types::{Axis, Mode};

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// One value per mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerMode<T> {
    pub translate: T,
    pub rotate: T,
    pub scale: T,
}

impl<T> PerMode<T> {
    pub fn get(&self, mode: Mode) -> &T {
        match mode {
            Mode::Translate => &self.translate,
            Mode::Rotate => &self.rotate,
            Mode::Scale => &self.scale,
        }
    }

    pub fn get_mut(&mut self, mode: Mode) -> &mut T {
        match mode {
            Mode::Translate => &mut self.translate,
            Mode::Rotate => &mut self.rotate,
            Mode::Scale => &mut self.scale,
        }
    }
}

/// All handle sets of the gizmo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandleTables {
    /// Visible handles
    pub gizmo: PerMode<Vec<Handle>>,
    /// Pick volumes
    pub picker: PerMode<Vec<Handle>>,
    /// Drag feedback
    pub helper: PerMode<Vec<Handle>>,
}

struct Palette {
    red: HandleMaterial,
    green: HandleMaterial,
    blue: HandleMaterial,
    yellow: HandleMaterial,
    cyan: HandleMaterial,
    magenta: HandleMaterial,
    yellow_translucent: HandleMaterial,
    cyan_translucent: HandleMaterial,
    magenta_translucent: HandleMaterial,
    white_translucent: HandleMaterial,
    gray: HandleMaterial,
    helper: HandleMaterial,
    invisible: HandleMaterial,
}

impl Palette {
    fn new(appearance: &AppearanceConfig) -> Self {
        let translucent = appearance.translucent_opacity;
        Self {
            red: HandleMaterial::opaque(appearance.x_axis_color),
            green: HandleMaterial::opaque(appearance.y_axis_color),
            blue: HandleMaterial::opaque(appearance.z_axis_color),
            yellow: HandleMaterial::opaque(appearance.xy_plane_color),
            cyan: HandleMaterial::opaque(appearance.yz_plane_color),
            magenta: HandleMaterial::opaque(appearance.xz_plane_color),
            yellow_translucent: HandleMaterial::new(appearance.xy_plane_color, translucent),
            cyan_translucent: HandleMaterial::new(appearance.yz_plane_color, translucent),
            magenta_translucent: HandleMaterial::new(appearance.xz_plane_color, translucent),
            white_translucent: HandleMaterial::new(WHITE, translucent),
            gray: HandleMaterial::opaque(appearance.free_ring_color),
            helper: HandleMaterial::new(WHITE, appearance.helper_opacity),
            invisible: HandleMaterial::new(WHITE, appearance.picker_opacity),
        }
    }
}

fn arrow() -> HandleShape {
    HandleShape::Cylinder {
        radius_top: 0.0,
        radius_bottom: 0.05,
        height: 0.2,
    }
}

fn free_arrow() -> HandleShape {
    HandleShape::Cylinder {
        radius_top: 0.03,
        radius_bottom: 0.0,
        height: 0.15,
    }
}

fn pick_stick(height: f32) -> HandleShape {
    HandleShape::Cylinder {
        radius_top: 0.2,
        radius_bottom: 0.0,
        height,
    }
}

fn line() -> HandleShape {
    HandleShape::Line {
        start: Vec3::ZERO,
        end: Vec3::X,
    }
}

fn diagonal_line() -> HandleShape {
    HandleShape::Line {
        start: Vec3::ZERO,
        end: Vec3::ONE,
    }
}

fn arc(radius: f32, turns: f32) -> HandleShape {
    HandleShape::Arc {
        radius,
        arc: turns * TAU,
    }
}

fn cube(size: f32) -> HandleShape {
    HandleShape::Box { size }
}

fn octahedron(radius: f32) -> HandleShape {
    HandleShape::Octahedron { radius }
}

fn square(size: f32) -> HandleShape {
    HandleShape::Plane {
        width: size,
        height: size,
    }
}

fn torus(radius: f32) -> HandleShape {
    HandleShape::Torus {
        radius,
        tube: 0.1,
        arc: TAU,
    }
}

fn build(entries: Vec<(HandleName, Part)>) -> Vec<Handle> {
    entries
        .into_iter()
        .map(|(name, part)| Handle::new(name, part))
        .collect()
}

fn translate_gizmo(p: &Palette) -> Vec<Handle> {
    build(vec![
        (A(Axis::X), Part::new(arrow(), p.red).at(1.0, 0.0, 0.0).rotated(0.0, 0.0, -FRAC_PI_2).tagged(HandleTag::Forward)),
        (A(Axis::X), Part::new(arrow(), p.red).at(1.0, 0.0, 0.0).rotated(0.0, 0.0, FRAC_PI_2).tagged(HandleTag::Backward)),
        (A(Axis::X), Part::new(line(), p.red)),
        (A(Axis::Y), Part::new(arrow(), p.green).at(0.0, 1.0, 0.0).tagged(HandleTag::Forward)),
        (A(Axis::Y), Part::new(arrow(), p.green).at(0.0, 1.0, 0.0).rotated(PI, 0.0, 0.0).tagged(HandleTag::Backward)),
        (A(Axis::Y), Part::new(line(), p.green).rotated(0.0, 0.0, FRAC_PI_2)),
        (A(Axis::Z), Part::new(arrow(), p.blue).at(0.0, 0.0, 1.0).rotated(FRAC_PI_2, 0.0, 0.0).tagged(HandleTag::Forward)),
        (A(Axis::Z), Part::new(arrow(), p.blue).at(0.0, 0.0, 1.0).rotated(-FRAC_PI_2, 0.0, 0.0).tagged(HandleTag::Backward)),
        (A(Axis::Z), Part::new(line(), p.blue).rotated(0.0, -FRAC_PI_2, 0.0)),
        (A(Axis::XYZ), Part::new(octahedron(0.1), p.white_translucent)),
        (A(Axis::XY), Part::new(square(0.295), p.yellow_translucent).at(0.15, 0.15, 0.0)),
        (A(Axis::XY), Part::new(line(), p.yellow).at(0.18, 0.3, 0.0).scaled(0.125, 1.0, 1.0)),
        (A(Axis::XY), Part::new(line(), p.yellow).at(0.3, 0.18, 0.0).rotated(0.0, 0.0, FRAC_PI_2).scaled(0.125, 1.0, 1.0)),
        (A(Axis::YZ), Part::new(square(0.295), p.cyan_translucent).at(0.0, 0.15, 0.15).rotated(0.0, FRAC_PI_2, 0.0)),
        (A(Axis::YZ), Part::new(line(), p.cyan).at(0.0, 0.18, 0.3).rotated(0.0, 0.0, FRAC_PI_2).scaled(0.125, 1.0, 1.0)),
        (A(Axis::YZ), Part::new(line(), p.cyan).at(0.0, 0.3, 0.18).rotated(0.0, -FRAC_PI_2, 0.0).scaled(0.125, 1.0, 1.0)),
        (A(Axis::XZ), Part::new(square(0.295), p.magenta_translucent).at(0.15, 0.0, 0.15).rotated(-FRAC_PI_2, 0.0, 0.0)),
        (A(Axis::XZ), Part::new(line(), p.magenta).at(0.18, 0.0, 0.3).scaled(0.125, 1.0, 1.0)),
        (A(Axis::XZ), Part::new(line(), p.magenta).at(0.3, 0.0, 0.18).rotated(0.0, -FRAC_PI_2, 0.0).scaled(0.125, 1.0, 1.0)),
    ])
}

fn translate_picker(p: &Palette) -> Vec<Handle> {
    build(vec![
        (A(Axis::X), Part::new(pick_stick(1.0), p.invisible).at(0.6, 0.0, 0.0).rotated(0.0, 0.0, -FRAC_PI_2)),
        (A(Axis::Y), Part::new(pick_stick(1.0), p.invisible).at(0.0, 0.6, 0.0)),
        (A(Axis::Z), Part::new(pick_stick(1.0), p.invisible).at(0.0, 0.0, 0.6).rotated(FRAC_PI_2, 0.0, 0.0)),
        (A(Axis::XYZ), Part::new(octahedron(0.2), p.invisible)),
        (A(Axis::XY), Part::new(square(0.4), p.invisible).at(0.2, 0.2, 0.0)),
        (A(Axis::YZ), Part::new(square(0.4), p.invisible).at(0.0, 0.2, 0.2).rotated(0.0, FRAC_PI_2, 0.0)),
        (A(Axis::XZ), Part::new(square(0.4), p.invisible).at(0.2, 0.0, 0.2).rotated(-FRAC_PI_2, 0.0, 0.0)),
    ])
}

fn axis_guides(p: &Palette) -> Vec<(HandleName, Part)> {
    vec![
        (A(Axis::X), Part::new(line(), p.helper).at(-1e3, 0.0, 0.0).scaled(1e6, 1.0, 1.0).tagged(HandleTag::Helper)),
        (A(Axis::Y), Part::new(line(), p.helper).at(0.0, -1e3, 0.0).rotated(0.0, 0.0, FRAC_PI_2).scaled(1e6, 1.0, 1.0).tagged(HandleTag::Helper)),
        (A(Axis::Z), Part::new(line(), p.helper).at(0.0, 0.0, -1e3).rotated(0.0, -FRAC_PI_2, 0.0).scaled(1e6, 1.0, 1.0).tagged(HandleTag::Helper)),
    ]
}

fn translate_helper(p: &Palette) -> Vec<Handle> {
    let mut entries = vec![
        (HandleName::Start, Part::new(octahedron(0.01), p.helper).tagged(HandleTag::Helper)),
        (HandleName::End, Part::new(octahedron(0.01), p.helper).tagged(HandleTag::Helper)),
        (HandleName::Delta, Part::new(diagonal_line(), p.helper).tagged(HandleTag::Helper)),
    ];
    entries.extend(axis_guides(p));
    build(entries)
}

fn rotate_gizmo(p: &Palette) -> Vec<Handle> {
    let free_arrow_part = |x: f32, y: f32, rz: f32, rx: f32| {
        Part::new(free_arrow(), p.yellow_translucent)
            .at(x, y, 0.0)
            .rotated(rx, 0.0, rz)
            .scaled(1.0, 1.0, 0.001)
    };
    build(vec![
        (A(Axis::X), Part::new(arc(1.0, 0.5), p.red)),
        (A(Axis::X), Part::new(octahedron(0.04), p.red).at(0.0, 0.0, 0.99).scaled(1.0, 3.0, 1.0)),
        (A(Axis::Y), Part::new(arc(1.0, 0.5), p.green).rotated(0.0, 0.0, -FRAC_PI_2)),
        (A(Axis::Y), Part::new(octahedron(0.04), p.green).at(0.0, 0.0, 0.99).scaled(3.0, 1.0, 1.0)),
        (A(Axis::Z), Part::new(arc(1.0, 0.5), p.blue).rotated(0.0, FRAC_PI_2, 0.0)),
        (A(Axis::Z), Part::new(octahedron(0.04), p.blue).at(0.99, 0.0, 0.0).scaled(1.0, 3.0, 1.0)),
        (A(Axis::E), Part::new(arc(1.25, 1.0), p.yellow_translucent).rotated(0.0, FRAC_PI_2, 0.0)),
        (A(Axis::E), free_arrow_part(1.17, 0.0, -FRAC_PI_2, 0.0)),
        (A(Axis::E), free_arrow_part(-1.17, 0.0, FRAC_PI_2, 0.0)),
        (A(Axis::E), free_arrow_part(0.0, -1.17, 0.0, PI)),
        (A(Axis::E), free_arrow_part(0.0, 1.17, 0.0, 0.0)),
        (A(Axis::XYZE), Part::new(arc(1.0, 1.0), p.gray).rotated(0.0, FRAC_PI_2, 0.0)),
    ])
}

fn rotate_picker(p: &Palette) -> Vec<Handle> {
    build(vec![
        (A(Axis::X), Part::new(torus(1.0), p.invisible).rotated(0.0, -FRAC_PI_2, -FRAC_PI_2)),
        (A(Axis::Y), Part::new(torus(1.0), p.invisible).rotated(FRAC_PI_2, 0.0, 0.0)),
        (A(Axis::Z), Part::new(torus(1.0), p.invisible).rotated(0.0, 0.0, -FRAC_PI_2)),
        (A(Axis::E), Part::new(torus(1.25), p.invisible)),
        (A(Axis::XYZE), Part::new(HandleShape::Sphere { radius: 0.7 }, p.invisible)),
    ])
}

fn rotate_helper(p: &Palette) -> Vec<Handle> {
    build(vec![(
        HandleName::RotationGuide,
        Part::new(line(), p.helper).at(-1e3, 0.0, 0.0).scaled(1e6, 1.0, 1.0).tagged(HandleTag::Helper),
    )])
}

fn scale_gizmo(p: &Palette) -> Vec<Handle> {
    build(vec![
        (A(Axis::X), Part::new(cube(0.125), p.red).at(0.8, 0.0, 0.0).rotated(0.0, 0.0, -FRAC_PI_2)),
        (A(Axis::X), Part::new(line(), p.red).scaled(0.8, 1.0, 1.0)),
        (A(Axis::Y), Part::new(cube(0.125), p.green).at(0.0, 0.8, 0.0)),
        (A(Axis::Y), Part::new(line(), p.green).rotated(0.0, 0.0, FRAC_PI_2).scaled(0.8, 1.0, 1.0)),
        (A(Axis::Z), Part::new(cube(0.125), p.blue).at(0.0, 0.0, 0.8).rotated(FRAC_PI_2, 0.0, 0.0)),
        (A(Axis::Z), Part::new(line(), p.blue).rotated(0.0, -FRAC_PI_2, 0.0).scaled(0.8, 1.0, 1.0)),
        (A(Axis::XY), Part::new(cube(0.125), p.yellow_translucent).at(0.85, 0.85, 0.0).scaled(2.0, 2.0, 0.2)),
        (A(Axis::XY), Part::new(line(), p.yellow).at(0.855, 0.98, 0.0).scaled(0.125, 1.0, 1.0)),
        (A(Axis::XY), Part::new(line(), p.yellow).at(0.98, 0.855, 0.0).rotated(0.0, 0.0, FRAC_PI_2).scaled(0.125, 1.0, 1.0)),
        (A(Axis::YZ), Part::new(cube(0.125), p.cyan_translucent).at(0.0, 0.85, 0.85).scaled(0.2, 2.0, 2.0)),
        (A(Axis::YZ), Part::new(line(), p.cyan).at(0.0, 0.855, 0.98).rotated(0.0, 0.0, FRAC_PI_2).scaled(0.125, 1.0, 1.0)),
        (A(Axis::YZ), Part::new(line(), p.cyan).at(0.0, 0.98, 0.855).rotated(0.0, -FRAC_PI_2, 0.0).scaled(0.125, 1.0, 1.0)),
        (A(Axis::XZ), Part::new(cube(0.125), p.magenta_translucent).at(0.85, 0.0, 0.85).scaled(2.0, 0.2, 2.0)),
        (A(Axis::XZ), Part::new(line(), p.magenta).at(0.855, 0.0, 0.98).scaled(0.125, 1.0, 1.0)),
        (A(Axis::XZ), Part::new(line(), p.magenta).at(0.98, 0.0, 0.855).rotated(0.0, -FRAC_PI_2, 0.0).scaled(0.125, 1.0, 1.0)),
        (A(Axis::XYZX), Part::new(cube(0.125), p.white_translucent).at(1.1, 0.0, 0.0)),
        (A(Axis::XYZY), Part::new(cube(0.125), p.white_translucent).at(0.0, 1.1, 0.0)),
        (A(Axis::XYZZ), Part::new(cube(0.125), p.white_translucent).at(0.0, 0.0, 1.1)),
    ])
}

fn scale_picker(p: &Palette) -> Vec<Handle> {
    build(vec![
        (A(Axis::X), Part::new(pick_stick(0.8), p.invisible).at(0.5, 0.0, 0.0).rotated(0.0, 0.0, -FRAC_PI_2)),
        (A(Axis::Y), Part::new(pick_stick(0.8), p.invisible).at(0.0, 0.5, 0.0)),
        (A(Axis::Z), Part::new(pick_stick(0.8), p.invisible).at(0.0, 0.0, 0.5).rotated(FRAC_PI_2, 0.0, 0.0)),
        (A(Axis::XY), Part::new(cube(0.125), p.invisible).at(0.85, 0.85, 0.0).scaled(3.0, 3.0, 0.2)),
        (A(Axis::YZ), Part::new(cube(0.125), p.invisible).at(0.0, 0.85, 0.85).scaled(0.2, 3.0, 3.0)),
        (A(Axis::XZ), Part::new(cube(0.125), p.invisible).at(0.85, 0.0, 0.85).scaled(3.0, 0.2, 3.0)),
        (A(Axis::XYZX), Part::new(cube(0.2), p.invisible).at(1.1, 0.0, 0.0)),
        (A(Axis::XYZY), Part::new(cube(0.2), p.invisible).at(0.0, 1.1, 0.0)),
        (A(Axis::XYZZ), Part::new(cube(0.2), p.invisible).at(0.0, 0.0, 1.1)),
    ])
}

fn scale_helper(p: &Palette) -> Vec<Handle> {
    build(axis_guides(p))
}

/// Build every handle set with the given colors
pub fn build_tables(appearance: &AppearanceConfig) -> HandleTables {
    let palette = Palette::new(appearance);
    HandleTables {
        gizmo: PerMode {
            translate: translate_gizmo(&palette),
            rotate: rotate_gizmo(&palette),
            scale: scale_gizmo(&palette),
        },
        picker: PerMode {
            translate: translate_picker(&palette),
            rotate: rotate_picker(&palette),
            scale: scale_picker(&palette),
        },
        helper: PerMode {
            translate: translate_helper(&palette),
            rotate: rotate_helper(&palette),
            scale: scale_helper(&palette),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(handles: &[Handle]) -> HashSet<&'static str> {
        handles.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_every_visible_handle_has_a_picker() {
        let tables = build_tables(&AppearanceConfig::default());
        for &mode in Mode::all() {
            let visible = names(tables.gizmo.get(mode));
            let pickers = names(tables.picker.get(mode));
            for name in pickers.iter() {
                assert!(visible.contains(name), "{mode:?} picker {name} has no handle");
            }
        }
    }

    #[test]
    fn test_pickers_are_solid() {
        let tables = build_tables(&AppearanceConfig::default());
        for &mode in Mode::all() {
            for handle in tables.picker.get(mode) {
                assert!(!handle.shape.is_line());
                assert!(handle.name.axis().is_some());
            }
        }
    }

    #[test]
    fn test_helpers_are_tagged() {
        let tables = build_tables(&AppearanceConfig::default());
        for &mode in Mode::all() {
            assert!(tables.helper.get(mode).iter().all(|h| h.tag == HandleTag::Helper));
        }
        assert_eq!(tables.helper.rotate.len(), 1);
    }

    #[test]
    fn test_colors_come_from_appearance() {
        let appearance = AppearanceConfig {
            x_axis_color: [0.9, 0.1, 0.1],
            ..Default::default()
        };
        let tables = build_tables(&appearance);
        let x_arrow = &tables.gizmo.translate[0];
        assert_eq!(x_arrow.material.color, [0.9, 0.1, 0.1]);
    }
}
