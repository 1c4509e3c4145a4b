//! Integration tests for the three canonical scenes.
//!
//! These check what each binary will do without opening a window: window
//! attributes, uploaded vertex data, per-frame draw sequence, exit key and
//! shader validity.

use psim::variants::{clear_screen, hello_triangle, three_triangles};
use psim::{CloseFlag, Input, KeyCode, ProgramId, Scene, Vec3, ORANGE, YELLOW};
use winit::dpi::PhysicalSize;

/// Validates WGSL code using naga.
fn validate_wgsl(code: &str) -> Result<(), String> {
    let module = naga::front::wgsl::parse_str(code)
        .map_err(|e| format!("WGSL parse error: {:?}", e))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(())
}

fn program_of(scene: &Scene, id: ProgramId) -> &psim::Program {
    &scene.programs()[id.index()]
}

// ============================================================================
// Window
// ============================================================================

#[test]
fn test_window_attributes_per_variant() {
    let cases = [
        (clear_screen(), 1920u32, 1080u32),
        (hello_triangle(), 800, 600),
        (three_triangles(), 800, 600),
    ];

    for (scene, width, height) in cases {
        let attrs = scene.window().attributes();
        assert_eq!(attrs.title, "Particle Simulator");
        assert_eq!(attrs.inner_size, Some(PhysicalSize::new(width, height).into()));
        assert!(attrs.resizable);
    }
}

#[test]
fn test_all_variants_validate() {
    for scene in [clear_screen(), hello_triangle(), three_triangles()] {
        assert!(scene.validate().is_ok());
    }
}

// ============================================================================
// Clear screen
// ============================================================================

#[test]
fn test_clear_screen_clears_color_and_depth() {
    let scene = clear_screen();
    let plan = scene.frame_plan();

    assert!(plan.draws.is_empty());
    assert_eq!(plan.clear_depth, Some(1.0));
    assert_eq!(plan.clear_color, psim::Vec4::new(0.1, 0.1, 0.15, 1.0));
    assert!(scene.report_backend());
    assert!(scene.programs().is_empty());
}

#[test]
fn test_clear_screen_has_no_exit_key() {
    let scene = clear_screen();
    assert_eq!(scene.exit_key(), None);

    let mut flag = CloseFlag::new(scene.exit_key());
    let mut input = Input::new();
    input.press(KeyCode::Escape);
    assert!(!flag.poll(&input));
}

// ============================================================================
// Triangles
// ============================================================================

#[test]
fn test_hello_triangle_vertices() {
    let scene = hello_triangle();
    assert_eq!(scene.meshes().len(), 1);
    assert_eq!(scene.frame_plan().clear_depth, None);

    let floats: &[f32] = bytemuck::cast_slice(scene.meshes()[0].triangle.as_bytes());
    assert_eq!(floats, &[-0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.0, 0.5, 0.0]);

    let program = program_of(&scene, scene.meshes()[0].program);
    assert_eq!(program.color, ORANGE);
}

#[test]
fn test_three_triangles_vertices() {
    let scene = three_triangles();
    let positions: Vec<[Vec3; 3]> = scene
        .meshes()
        .iter()
        .map(|m| m.triangle.positions())
        .collect();

    assert_eq!(
        positions[0],
        [
            Vec3::new(-0.8, -0.8, 0.0),
            Vec3::new(0.0, -0.8, 0.0),
            Vec3::new(-0.4, 0.0, 0.0),
        ]
    );
    assert_eq!(
        positions[1],
        [
            Vec3::new(0.0, -0.8, 0.0),
            Vec3::new(0.8, -0.8, 0.0),
            Vec3::new(0.4, 0.0, 0.0),
        ]
    );
    assert_eq!(
        positions[2],
        [
            Vec3::new(-0.4, 0.0, 0.0),
            Vec3::new(0.4, 0.0, 0.0),
            Vec3::new(0.0, 0.8, 0.0),
        ]
    );
}

#[test]
fn test_three_triangles_frame_plan() {
    let scene = three_triangles();
    let plan = scene.frame_plan();

    assert_eq!(plan.draws.len(), 3);
    for (i, draw) in plan.draws.iter().enumerate() {
        assert_eq!(draw.mesh, i);
        assert_eq!(draw.vertices, 0..3);
        assert_eq!(draw.program, scene.meshes()[i].program);
    }

    let yellow_draws = plan
        .draws
        .iter()
        .filter(|d| program_of(&scene, d.program).color == YELLOW)
        .count();
    let orange_draws = plan
        .draws
        .iter()
        .filter(|d| program_of(&scene, d.program).color == ORANGE)
        .count();
    assert_eq!(yellow_draws, 1);
    assert_eq!(orange_draws, 2);

    // The top triangle never uses the yellow program
    assert_ne!(program_of(&scene, plan.draws[2].program).color, YELLOW);
}

#[test]
fn test_escape_closes_triangle_variants() {
    for scene in [hello_triangle(), three_triangles()] {
        let mut flag = CloseFlag::new(scene.exit_key());
        let mut input = Input::new();

        assert!(!flag.poll(&input));
        input.press(KeyCode::Escape);
        assert!(flag.poll(&input));
    }
}

// ============================================================================
// Shaders
// ============================================================================

#[test]
fn test_program_shaders_are_valid_wgsl() {
    for scene in [hello_triangle(), three_triangles()] {
        for program in scene.programs() {
            validate_wgsl(program.vertex_source()).expect("vertex stage should be valid");
            validate_wgsl(&program.fragment_source()).expect("fragment stage should be valid");
        }
    }
}

#[test]
fn test_broken_fragment_is_rejected() {
    let src = psim::shader::fragment_source(ORANGE).replace("return", "retrun");
    assert!(validate_wgsl(&src).is_err());
}
