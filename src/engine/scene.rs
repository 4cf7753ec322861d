//! Scene description: a JSON file listing bodies, camera and animation settings.
//!
//! Angles are degrees on disk and radians in memory. Spin rates are radians per
//! second in both. Bodies may appear in any order; `build` inserts parents first.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::animation_loop::AnimationControls;
use crate::engine::ecs::component::{
    MeshKind, OrbitingBody, RenderableComponent, Shading, TurntableCamera, TurntableParams,
};
use crate::engine::ecs::system::{CameraInputSettings, Lens};
use crate::engine::ecs::{BodyId, World};
use crate::engine::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub default_radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub default_azimuth_deg: f32,
    /// Positive values put the eye below the orbital plane.
    pub default_polar_deg: f32,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub keyboard_orbit_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let lens = Lens::default();
        let input = CameraInputSettings::default();
        Self {
            default_radius: 12.0,
            min_radius: 1.0,
            max_radius: 20.0,
            default_azimuth_deg: 0.0,
            default_polar_deg: -20.0,
            fov_y_deg: 60.0,
            z_near: lens.z_near,
            z_far: lens.z_far,
            rotate_speed: input.rotate_speed,
            zoom_speed: input.zoom_speed,
            keyboard_orbit_speed: input.keyboard_orbit_speed,
        }
    }
}

impl CameraConfig {
    pub fn turntable(&self) -> TurntableCamera {
        TurntableCamera::new(TurntableParams {
            default_radius: self.default_radius,
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            default_azimuth: self.default_azimuth_deg.to_radians(),
            default_polar: self.default_polar_deg.to_radians(),
        })
    }

    pub fn lens(&self) -> Lens {
        Lens {
            fov_y: self.fov_y_deg.to_radians(),
            z_near: self.z_near,
            z_far: self.z_far,
        }
    }

    pub fn input_settings(&self) -> CameraInputSettings {
        CameraInputSettings {
            rotate_speed: self.rotate_speed,
            zoom_speed: self.zoom_speed,
            keyboard_orbit_speed: self.keyboard_orbit_speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub speed: f32,
    pub paused: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            paused: false,
        }
    }
}

impl AnimationConfig {
    pub fn controls(&self) -> AnimationControls {
        AnimationControls::new(self.speed, self.paused)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub name: String,
    pub parent: Option<String>,
    pub scale: f32,
    pub axis_tilt_deg: f32,
    pub orbit_tilt_deg: f32,
    pub orbit_radius: f32,
    pub axis_spin_rate: f32,
    pub orbit_spin_rate: f32,
    pub mesh: MeshKind,
    pub color: [f32; 4],
    pub shading: Shading,
}

impl Default for BodyConfig {
    fn default() -> Self {
        let body = OrbitingBody::default();
        let renderable = RenderableComponent::default();
        Self {
            name: String::new(),
            parent: None,
            scale: body.scale,
            axis_tilt_deg: 0.0,
            orbit_tilt_deg: 0.0,
            orbit_radius: body.orbit_radius,
            axis_spin_rate: body.axis_spin_rate,
            orbit_spin_rate: body.orbit_spin_rate,
            mesh: renderable.mesh,
            color: renderable.color,
            shading: renderable.shading,
        }
    }
}

impl BodyConfig {
    pub fn orbiting_body(&self) -> OrbitingBody {
        OrbitingBody::new()
            .with_scale(self.scale)
            .with_axis_tilt(self.axis_tilt_deg.to_radians())
            .with_orbit_tilt(self.orbit_tilt_deg.to_radians())
            .with_orbit_radius(self.orbit_radius)
            .with_axis_spin_rate(self.axis_spin_rate)
            .with_orbit_spin_rate(self.orbit_spin_rate)
    }

    pub fn renderable(&self) -> RenderableComponent {
        RenderableComponent::new(self.mesh, self.color, self.shading)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub bodies: Vec<BodyConfig>,
}

impl SceneConfig {
    /// Star backdrop, sun, earth and moon.
    ///
    /// A child inherits its parent's scale and axis tilt, so the moon's numbers
    /// are relative to the earth's 0.4 scale and it orbits in the earth's
    /// tilted equatorial plane.
    pub fn default_solar_system() -> Self {
        let body = |name: &str, parent: Option<&str>| BodyConfig {
            name: name.to_owned(),
            parent: parent.map(str::to_owned),
            ..BodyConfig::default()
        };

        Self {
            camera: CameraConfig::default(),
            animation: AnimationConfig::default(),
            bodies: vec![
                BodyConfig {
                    scale: 45.0,
                    axis_spin_rate: 0.01,
                    orbit_spin_rate: 0.0,
                    color: [0.03, 0.03, 0.08, 1.0],
                    shading: Shading::Unlit,
                    ..body("stars", None)
                },
                BodyConfig {
                    axis_spin_rate: 0.2,
                    orbit_spin_rate: 0.0,
                    color: [1.0, 0.85, 0.3, 1.0],
                    shading: Shading::Light,
                    ..body("sun", None)
                },
                BodyConfig {
                    scale: 0.4,
                    axis_tilt_deg: 23.4,
                    orbit_radius: 6.0,
                    axis_spin_rate: 1.0,
                    orbit_spin_rate: 0.3,
                    color: [0.2, 0.45, 1.0, 1.0],
                    ..body("earth", Some("sun"))
                },
                BodyConfig {
                    scale: 0.3,
                    orbit_radius: 4.0,
                    axis_spin_rate: 0.0,
                    orbit_spin_rate: 1.2,
                    color: [0.7, 0.7, 0.7, 1.0],
                    ..body("moon", Some("earth"))
                },
            ],
        }
    }

    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let scene = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::info!(
            "[Scene] loaded {} bodies from {}",
            scene.bodies.len(),
            path.display()
        );
        Ok(scene)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?)?;
        log::info!("[Scene] wrote {} bodies to {}", self.bodies.len(), path.display());
        Ok(())
    }

    /// Build the body arena, inserting every parent before its children.
    pub fn build(&self) -> EngineResult<World> {
        let mut names = HashSet::new();
        for b in &self.bodies {
            if !names.insert(b.name.as_str()) {
                return Err(EngineError::DuplicateBody(b.name.clone()));
            }
        }
        for b in &self.bodies {
            if let Some(parent) = &b.parent {
                if !names.contains(parent.as_str()) {
                    return Err(EngineError::UnknownParent {
                        body: b.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let mut world = World::new();
        let mut placed: HashMap<&str, BodyId> = HashMap::new();
        let mut remaining: Vec<&BodyConfig> = self.bodies.iter().collect();

        // Each pass places every body whose parent is already placed. A pass
        // that places nothing means the rest hang off a cycle.
        while !remaining.is_empty() {
            let before = remaining.len();
            let mut deferred = Vec::new();

            for b in remaining {
                let parent = match b.parent.as_deref() {
                    None => None,
                    Some(p) => match placed.get(p) {
                        Some(&id) => Some(id),
                        None => {
                            deferred.push(b);
                            continue;
                        }
                    },
                };
                let id = world.add_body(&b.name, b.orbiting_body(), b.renderable(), parent)?;
                placed.insert(b.name.as_str(), id);
            }

            if deferred.len() == before {
                return Err(EngineError::ParentCycle(deferred[0].name.clone()));
            }
            remaining = deferred;
        }

        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn body(name: &str, parent: Option<&str>) -> BodyConfig {
        BodyConfig {
            name: name.to_owned(),
            parent: parent.map(str::to_owned),
            ..BodyConfig::default()
        }
    }

    fn scene(bodies: Vec<BodyConfig>) -> SceneConfig {
        SceneConfig {
            bodies,
            ..SceneConfig::default()
        }
    }

    #[test]
    fn default_scene_builds() {
        let world = SceneConfig::default_solar_system().build().unwrap();
        assert_eq!(world.len(), 4);

        let sun = world.find_by_name("sun").unwrap();
        let earth = world.find_by_name("earth").unwrap();
        let moon = world.find_by_name("moon").unwrap();
        assert_eq!(world.parent_of(earth), Some(sun));
        assert_eq!(world.parent_of(moon), Some(earth));
        assert_eq!(world.roots().len(), 2);
    }

    #[test]
    fn children_listed_before_parents_still_build() {
        let mut world = scene(vec![
            body("moon", Some("earth")),
            body("earth", Some("sun")),
            body("sun", None),
        ])
        .build()
        .unwrap();

        let ids = world.update_order().to_vec();
        let order: Vec<&str> = ids.iter().map(|&id| world.name_of(id).unwrap()).collect();
        assert_eq!(order, vec!["sun", "earth", "moon"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = scene(vec![body("sun", None), body("sun", None)])
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateBody(name) if name == "sun"));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let err = scene(vec![body("moon", Some("earth"))]).build().unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnknownParent { ref body, ref parent } if body == "moon" && parent == "earth"
        ));
    }

    #[test]
    fn cycles_are_rejected() {
        let err = scene(vec![
            body("sun", None),
            body("a", Some("b")),
            body("b", Some("a")),
        ])
        .build()
        .unwrap_err();
        assert!(matches!(err, EngineError::ParentCycle(_)));

        let err = scene(vec![body("ouroboros", Some("ouroboros"))])
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::ParentCycle(name) if name == "ouroboros"));
    }

    #[test]
    fn degrees_become_radians() {
        let b = BodyConfig {
            axis_tilt_deg: 90.0,
            orbit_tilt_deg: 180.0,
            ..body("tilted", None)
        };
        let ob = b.orbiting_body();
        assert!((ob.axis_tilt - PI / 2.0).abs() < 1e-6);
        assert!((ob.orbit_tilt - PI).abs() < 1e-6);

        let cam = CameraConfig {
            default_polar_deg: -30.0,
            ..CameraConfig::default()
        }
        .turntable();
        assert!((cam.polar() + PI / 6.0).abs() < 1e-6);
    }

    #[test]
    fn json_survives_save_and_load() {
        let original = SceneConfig::default_solar_system();
        let json = original.to_json_string().unwrap();
        assert_eq!(SceneConfig::from_json_str(&json).unwrap(), original);

        let path = std::env::temp_dir().join(format!("little-orrery-{}.json", std::process::id()));
        original.save(&path).unwrap();
        let loaded = SceneConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed = SceneConfig::from_json_str(
            r#"{ "bodies": [ { "name": "sun", "shading": "light" }, { "name": "rock", "parent": "sun", "mesh": "cube" } ] }"#,
        )
        .unwrap();

        assert_eq!(parsed.camera, CameraConfig::default());
        assert_eq!(parsed.animation, AnimationConfig::default());
        assert_eq!(parsed.bodies[0].shading, Shading::Light);
        assert_eq!(parsed.bodies[1].mesh, MeshKind::Cube);
        assert_eq!(parsed.bodies[1].scale, 1.0);
        assert_eq!(parsed.bodies[1].orbit_spin_rate, 1.0);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = SceneConfig::from_json_str("{ \"bodies\": 3 }").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
