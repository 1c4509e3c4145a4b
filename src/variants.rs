//! The three canonical scenes, one per binary.
//!
//! | Scene | Window | Draws |
//! |-------|--------|-------|
//! | [`clear_screen`] | 1920x1080 | clear color + depth only |
//! | [`hello_triangle`] | 800x600 | one orange triangle |
//! | [`three_triangles`] | 800x600 | two orange and one yellow triangle |

use glam::Vec4;
use winit::keyboard::KeyCode;

use crate::geometry::Triangle;
use crate::scene::{Scene, WindowConfig, DEFAULT_TITLE};
use crate::shader::{Program, ORANGE, YELLOW};

pub const CLEAR_SCREEN_COLOR: Vec4 = Vec4::new(0.1, 0.1, 0.15, 1.0);
pub const TRIANGLE_CLEAR_COLOR: Vec4 = Vec4::new(0.2, 0.3, 0.3, 1.0);

pub const HELLO_TRIANGLE: Triangle =
    Triangle::from_positions([[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]]);

#[rustfmt::skip]
pub const LEFT_TRIANGLE: Triangle =
    Triangle::from_positions([[-0.8, -0.8, 0.0], [0.0, -0.8, 0.0], [-0.4, 0.0, 0.0]]);
#[rustfmt::skip]
pub const RIGHT_TRIANGLE: Triangle =
    Triangle::from_positions([[0.0, -0.8, 0.0], [0.8, -0.8, 0.0], [0.4, 0.0, 0.0]]);
#[rustfmt::skip]
pub const TOP_TRIANGLE: Triangle =
    Triangle::from_positions([[-0.4, 0.0, 0.0], [0.4, 0.0, 0.0], [0.0, 0.8, 0.0]]);

fn window(width: u32, height: u32) -> WindowConfig {
    WindowConfig {
        width,
        height,
        title: DEFAULT_TITLE.to_string(),
        resizable: true,
    }
}

/// Full HD window that only clears, and reports the backend on startup.
pub fn clear_screen() -> Scene {
    Scene::new()
        .with_window(window(1920, 1080))
        .with_clear_color(CLEAR_SCREEN_COLOR)
        .with_depth_test(true)
        .with_backend_report(true)
}

pub fn hello_triangle() -> Scene {
    let mut scene = Scene::new()
        .with_window(window(800, 600))
        .with_clear_color(TRIANGLE_CLEAR_COLOR)
        .with_exit_key(KeyCode::Escape);

    let orange = scene.add_program(Program::new("Orange", ORANGE));
    scene.add_triangle(HELLO_TRIANGLE, orange);
    scene
}

/// Three triangles sharing two programs; only the right one is yellow.
pub fn three_triangles() -> Scene {
    let mut scene = Scene::new()
        .with_window(window(800, 600))
        .with_clear_color(TRIANGLE_CLEAR_COLOR)
        .with_exit_key(KeyCode::Escape);

    let orange = scene.add_program(Program::new("Orange", ORANGE));
    let yellow = scene.add_program(Program::new("Yellow", YELLOW));
    scene.add_triangle(LEFT_TRIANGLE, orange);
    scene.add_triangle(RIGHT_TRIANGLE, yellow);
    scene.add_triangle(TOP_TRIANGLE, orange);
    scene
}
