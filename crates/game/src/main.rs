//! barrelyard - headless barrel stacking simulation
//!
//! Spawns a configured stack of barrels into a Z-up physics world, runs
//! the fixed-timestep loop (advance physics, then sync every object to
//! the scene graph) until the stack falls asleep, knocks the top barrel
//! to wake it, lets everything settle again, then tears the scene down.

mod barrel;
mod config;

use anyhow::Result;
use barrel::Barrel;
use config::SimConfig;
use engine_core::FrameClock;
use glam::Vec3;
use physics::{PhysicsWorld, GRAVITY_Z_UP};
use rand::Rng;
use scene::{Assets, Model, SceneGraph};
use std::time::Duration;

/// Placeholder barrel mesh: an octagonal prism with its pivot at the
/// base, so the centroid offset correction is actually exercised.
fn barrel_model() -> Model {
    let mut positions = Vec::new();
    for ring in 0..=1 {
        let z = ring as f32 * 1.1;
        for i in 0..8 {
            let angle = i as f32 * std::f32::consts::TAU / 8.0;
            positions.push(Vec3::new(angle.cos() * 0.45, angle.sin() * 0.45, z));
        }
    }
    Model::from_positions("barrel", &positions)
}

/// Run fixed steps (physics, then per-object sync) until every barrel
/// sleeps or the step budget runs out.
fn run_until_settled(
    physics: &mut PhysicsWorld,
    scene: &mut SceneGraph,
    barrels: &[Barrel],
    max_steps: u32,
) {
    let mut clock = FrameClock::new();
    let mut steps = 0;
    while steps < max_steps {
        clock.update();
        while steps < max_steps && clock.should_fixed_update() {
            physics.step();
            for barrel in barrels {
                barrel.on_step(physics, scene);
            }
            steps += 1;
        }
        let all_asleep = barrels.iter().all(|b| {
            b.body_handle()
                .map(|h| physics.is_body_sleeping(h))
                .unwrap_or(true)
        });
        if all_asleep {
            log::info!(
                "stack settled after {} steps ({:.1}s)",
                steps,
                clock.elapsed_seconds()
            );
            return;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    log::info!("step budget exhausted after {} steps", steps);
}

/// Log every barrel's rendered height and sleep state, recovering each
/// owner from the user-data tag on its body.
fn report(physics: &PhysicsWorld, scene: &SceneGraph, barrels: &[Barrel]) {
    for barrel in barrels {
        let Some(body) = barrel.body_handle() else {
            continue;
        };
        let tag = physics.body_user_data(body).unwrap_or_default();
        let name = barrels
            .get(tag as usize)
            .map(|b| b.name())
            .unwrap_or("<unknown>");
        if let Some(node) = barrel.node_handle().and_then(|h| scene.node(h)) {
            let state = if physics.is_body_sleeping(body) {
                "asleep"
            } else {
                "awake"
            };
            log::info!("  {}: z={:.2} ({})", name, node.transform.position.z, state);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting barrelyard");

    let config = SimConfig::load();
    let mut assets = Assets::new();
    assets.insert(barrel_model());

    let mut scene = SceneGraph::new();
    let mut physics = PhysicsWorld::new(GRAVITY_Z_UP);
    physics.add_ground_plane();

    let mut rng = rand::thread_rng();
    let mut barrels = Vec::new();
    for (i, object) in config.objects.iter().enumerate() {
        let mut barrel = Barrel::from_config(object, &assets, i as u64)?;
        // Tiny horizontal jitter so a mathematically perfect stack still
        // produces distinct contact normals.
        let jitter = Vec3::new(rng.gen_range(-0.01..0.01), rng.gen_range(-0.01..0.01), 0.0);
        barrel.set_position(barrel.position() + jitter);
        barrel.add_to_scene(&mut scene, &mut physics, &assets)?;
        barrels.push(barrel);
    }
    log::info!("{} barrels in the scene", barrels.len());

    run_until_settled(&mut physics, &mut scene, &barrels, config.settle_steps);
    report(&physics, &scene, &barrels);

    // Knock the top barrel to show the stack waking and re-settling.
    if let Some(top) = barrels.last() {
        if let Some(body) = top.body_handle() {
            log::info!("knocking '{}'", top.name());
            physics.apply_impulse(body, Vec3::new(top.mass() * 0.8, 0.0, 0.0));
        }
    }
    run_until_settled(&mut physics, &mut scene, &barrels, config.settle_steps);
    report(&physics, &scene, &barrels);

    for barrel in &mut barrels {
        barrel.remove_from_scene(&mut scene, &mut physics);
    }
    log::info!(
        "scene cleared: {} nodes, {} bodies remain",
        scene.node_count(),
        physics.rigid_body_set.len()
    );

    Ok(())
}
