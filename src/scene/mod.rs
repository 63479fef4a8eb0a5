//! Authoritative scene: the optional loaded model and environment map.
//!
//! Both assets arrive asynchronously, so either may be absent; everything
//! downstream treats a missing model or environment as a normal state.
//! Each install bumps a generation counter the renderer compares against
//! to know when to re-upload GPU resources.

pub mod bounds;
pub mod environment;
pub mod fit;
pub mod model;
pub mod transform;

pub use bounds::BoundingBox;
pub use environment::EnvironmentMap;
pub use fit::{compute_fit, fit_or_identity, FitError, FitResult};
pub use model::{MeshVertex, Model, ModelMesh, Rgba8Image};
pub use transform::{normal_matrix, Orientation, Renderable, Transform};

/// The authoritative scene.
#[derive(Debug, Default)]
pub struct Scene {
    model: Option<Model>,
    environment: Option<EnvironmentMap>,
    /// Bumped on every model install.
    model_generation: u64,
    /// Bumped on every environment install.
    environment_generation: u64,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a freshly loaded mesh, normalized so its largest dimension is
    /// `target_size` and its bounds are centered on the origin.
    ///
    /// Replaces any previous model. Returns the fit that was applied
    /// (identity when the mesh is degenerate).
    pub fn install_model(
        &mut self,
        mesh: ModelMesh,
        target_size: f32,
    ) -> FitResult {
        let mut model = Model::new(mesh);
        let fit = fit_or_identity(&model.bounding_box(), target_size);
        fit.apply(&mut model);
        log::info!(
            "model installed: {} vertices, {} triangles, scale {:.4}",
            model.mesh().vertices.len(),
            model.mesh().triangle_count(),
            fit.scale,
        );
        self.model = Some(model);
        self.model_generation += 1;
        fit
    }

    /// Use `map` as the lighting environment, replacing any previous one.
    pub fn install_environment(&mut self, map: EnvironmentMap) {
        let [r, g, b] = map.average_radiance();
        log::info!(
            "environment installed: {}x{}, mean radiance ({r:.3}, {g:.3}, \
             {b:.3})",
            map.width(),
            map.height(),
        );
        self.environment = Some(map);
        self.environment_generation += 1;
    }

    /// The loaded model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Mutable access to the loaded model, if any.
    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    /// The loaded environment map, if any.
    #[must_use]
    pub fn environment(&self) -> Option<&EnvironmentMap> {
        self.environment.as_ref()
    }

    /// Number of model installs so far.
    #[must_use]
    pub fn model_generation(&self) -> u64 {
        self.model_generation
    }

    /// Number of environment installs so far.
    #[must_use]
    pub fn environment_generation(&self) -> u64 {
        self.environment_generation
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::model::tests::box_mesh;
    use super::*;

    #[test]
    fn new_scene_is_empty() {
        let scene = Scene::new();
        assert!(scene.model().is_none());
        assert!(scene.environment().is_none());
        assert_eq!(scene.model_generation(), 0);
    }

    #[test]
    fn installed_model_is_fitted() {
        let mut scene = Scene::new();
        let fit = scene.install_model(
            box_mesh(Vec3::new(-1.0, -2.0, -1.0), Vec3::new(3.0, 2.0, 1.0)),
            2.0,
        );
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.translation, Vec3::new(-0.5, 0.0, 0.0));

        let model = scene.model().unwrap();
        let world = model.bounding_box();
        assert!(world.center().length() < 1e-6);
        assert!((world.max_dimension() - 2.0).abs() < 1e-6);
        assert_eq!(scene.model_generation(), 1);
    }

    #[test]
    fn degenerate_model_falls_back_to_identity() {
        let mut scene = Scene::new();
        let fit = scene.install_model(
            box_mesh(Vec3::splat(2.0), Vec3::splat(2.0)),
            2.0,
        );
        assert_eq!(fit, FitResult::IDENTITY);
        assert_eq!(scene.model().unwrap().transform, Transform::IDENTITY);
    }

    #[test]
    fn environment_install_bumps_generation() {
        let mut scene = Scene::new();
        scene.install_environment(EnvironmentMap::uniform([1.0; 3]));
        scene.install_environment(EnvironmentMap::uniform([0.5; 3]));
        assert_eq!(scene.environment_generation(), 2);
        assert_eq!(scene.environment().unwrap().texels()[0][0], 0.5);
    }
}
