//! Minimal scene viewer
//!
//! Demonstrates the bootstrap facade: build a setup, hand it a small scene,
//! optionally turn on the debug overlay, and start the engine. Press escape
//! or close the window to quit.

use nalgebra::{Point3, Vector3};
use prism_engine::prelude::*;
use prism_engine::scene::TextureSlot;

fn build_scene() -> SceneRef {
    let root = SceneNode::group();

    // A second light besides the default one the setup owns.
    root.borrow_mut()
        .add_node(SceneNode::new(NodeKind::DirectionalLight(DirectionalLight {
            direction: Vector3::new(-1.0, -1.0, 0.0),
            color: [0.9, 0.85, 0.8],
        })));

    // One textured quad so the texture loader has work to do.
    let mut geometry = Geometry {
        mesh: MeshData {
            positions: vec![
                Point3::new(-1.0, -1.0, -5.0),
                Point3::new(1.0, -1.0, -5.0),
                Point3::new(1.0, 1.0, -5.0),
                Point3::new(-1.0, 1.0, -5.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        },
        material: Material::default(),
    };
    geometry.material.texture = Some(TextureSlot::new("checker.png"));
    root.borrow_mut()
        .add_node(SceneNode::new(NodeKind::Geometry(geometry)));

    root
}

fn main() -> Result<(), SetupError> {
    let mut setup = EngineSetup::new("prism viewer")?;
    setup.add_data_directory("data");

    let scene = build_scene();
    setup.set_scene(scene.clone());

    setup
        .camera()
        .borrow_mut()
        .set_position(Point3::new(0.0, 1.5, 4.0));
    setup
        .camera()
        .borrow_mut()
        .look_at(Point3::new(0.0, 0.0, -5.0), Vector3::y());

    if std::env::var_os("PRISM_DEBUG").is_some() {
        setup.enable_debugging();
    } else {
        setup.show_fps();
    }

    log::info!("viewer ready, press escape to quit");
    setup.engine().borrow_mut().start();

    // `scene` stays alive until here, as the facade requires of the caller.
    drop(scene);
    Ok(())
}
