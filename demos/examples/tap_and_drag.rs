// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap to place, long-press to drag.
//!
//! A simulated session detects a floor plane. A tap places a box on it, a long-press
//! drags the box across the floor, and releasing replaces the box's anchor at the
//! final pose. Tracking then degrades and a second tap is refused.
//!
//! Run:
//! - `cargo run -p anchorage_demos --example tap_and_drag`
//! - `RUST_LOG=anchorage_placement=debug cargo run -p anchorage_demos --example tap_and_drag`

use anchorage_placement::adapters::scene_view::PlacementDelegate;
use anchorage_placement::{
    Catalog, DragOutcome, Kind, LongPressPhase, PlacementController, PlacementSettings,
    SceneExecutor, scene_channel,
};
use anchorage_scene::{Geometry, LocalNode, NodeId, Prototype};
use anchorage_session::{
    Camera, LimitedReason, PlaneAnchor, SceneView, SessionConfig, TrackingState,
};
use glam::{Mat4, Vec3};
use kurbo::{Point, Size};
use tracing_subscriber::EnvFilter;

const FLOOR_Y: f32 = -1.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Furniture {
    Box,
    Chair,
}

impl Kind for Furniture {
    const ALL: &'static [Self] = &[Self::Box, Self::Chair];

    fn tag(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Chair => "chair",
        }
    }
}

struct App {
    view: SceneView,
    catalog: Catalog<Furniture, Prototype>,
    controller: PlacementController<Furniture, NodeId>,
    delegate: PlacementDelegate<Furniture>,
    executor: SceneExecutor<Furniture, NodeId>,
}

impl App {
    fn frame(&mut self) {
        self.view.frame(&mut self.delegate);
        self.controller.set_tracking(self.delegate.tracking());
        let bound = self.executor.run_pending(&self.catalog, &mut self.view);
        if bound > 0 {
            println!("  bound {bound} object(s)");
        }
    }

    fn report(&self) {
        for anchor in self.view.session().anchors() {
            let Some(tag) = anchor.tag() else {
                continue;
            };
            let p = anchor.transform.w_axis.truncate();
            println!("  anchor {:?} `{tag}` at ({:.2}, {:.2}, {:.2})", anchor.id, p.x, p.y, p.z);
        }
    }
}

/// Pixel looking straight down at world (x, z) through the demo camera.
fn px(x: f32, z: f32) -> Point {
    Point::new(f64::from((x + 5.0) * 10.0), f64::from((z + 5.0) * 10.0))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings: PlacementSettings = toml::from_str(include_str!("../placement.toml"))?;
    let config = settings.resolve::<Furniture>()?;

    // 10 m above the origin, 10 m across, on a 100 by 100 pixel viewport.
    let camera = Camera::orthographic_top_down(Vec3::ZERO, 10.0, 5.0, Size::new(100.0, 100.0));
    let mut view = SceneView::new(camera);
    view.session_mut().run(SessionConfig::default());
    view.session_mut().set_tracking_state(TrackingState::Normal);
    let _ = view.session_mut().detect_plane(
        Mat4::from_translation(Vec3::new(0.0, FLOOR_Y, 0.0)),
        PlaneAnchor::horizontal(6.0, 6.0),
    );

    let mut catalog = Catalog::default();
    let cube = Prototype::new(LocalNode::with_geometry(Geometry::cuboid(0.2, 0.2, 0.2)));
    let _ = catalog.register(&view, Furniture::Box, cube);
    let mut chair = Prototype::new(LocalNode::default());
    let _ = chair.push_child(0, LocalNode::with_geometry(Geometry::cuboid(0.45, 0.45, 0.45)));
    let _ = catalog.register(&view, Furniture::Chair, chair);

    let (binder, executor) = scene_channel();
    let mut app = App {
        view,
        catalog,
        controller: PlacementController::new(config),
        delegate: PlacementDelegate::new(binder),
        executor,
    };
    app.frame();

    println!("tap at (1.00, 2.00)");
    let requested = app.controller.tap(&mut app.view, px(1.0, 2.0));
    println!("  requested {requested} anchor(s)");
    app.frame();
    app.report();

    println!("long-press and drag toward (1.50, 1.50)");
    let mut at = Vec3::new(1.0, FLOOR_Y, 2.0);
    let _ = app
        .controller
        .long_press(&mut app.view, px(at.x, at.z), LongPressPhase::Began);
    for _ in 0..10 {
        at += Vec3::new(0.05, 0.0, -0.05);
        let outcome = app
            .controller
            .long_press(&mut app.view, px(at.x, at.z), LongPressPhase::Changed);
        if let DragOutcome::Moved { position, .. } = outcome {
            println!("  moved to ({:.2}, {:.2}, {:.2})", position.x, position.y, position.z);
        }
    }
    match app
        .controller
        .try_long_press(&mut app.view, px(at.x, at.z), LongPressPhase::Ended)
    {
        Ok(DragOutcome::Committed { pose, .. }) => {
            let p = pose.w_axis.truncate();
            println!("  released; new anchor at ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
        }
        Ok(_) => println!("  released; nothing to commit"),
        Err(error) => println!("  released; {error}"),
    }
    app.frame();
    app.report();

    println!("tracking degrades");
    app.view
        .session_mut()
        .set_tracking_state(TrackingState::Limited(LimitedReason::ExcessiveMotion));
    app.frame();
    if let Err(error) = app.controller.try_tap(&mut app.view, px(-1.0, -1.0)) {
        println!("  tap refused: {error}");
    }

    Ok(())
}
