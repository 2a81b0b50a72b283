use super::ids::BoxId;
use crate::core::geometry::{Cuboid, GeometryError};
use slotmap::SlotMap;
use std::collections::HashMap;
use std::ops::Index;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("A box named '{0}' already exists in the scene")]
    DuplicateName(String),
    #[error("Invalid box geometry: {0}")]
    Geometry(#[from] GeometryError),
}

/// Owns every box of a layout problem.
///
/// Boxes are stored in a slot map and addressed by [`BoxId`]. The scene is
/// append-only, so an id handed out by a scene stays valid for as long as the
/// scene lives. Names are unique and double as stable cross-reference keys for
/// records.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Primary storage for boxes.
    boxes: SlotMap<BoxId, Cuboid>,
    /// Insertion order of the boxes.
    order: Vec<BoxId>,
    /// Lookup map from box name to its id.
    name_map: HashMap<String, BoxId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a box to the scene.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateName`] if a box with the same name exists.
    pub fn add(&mut self, cuboid: Cuboid) -> Result<BoxId, SceneError> {
        if self.name_map.contains_key(&cuboid.name) {
            return Err(SceneError::DuplicateName(cuboid.name));
        }
        let name = cuboid.name.clone();
        let id = self.boxes.insert(cuboid);
        self.order.push(id);
        self.name_map.insert(name, id);
        Ok(id)
    }

    /// Builds and adds a box in one step.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError`] if the geometry is invalid or the name is taken.
    pub fn add_box(
        &mut self,
        loc: [f64; 3],
        rot: [f64; 3],
        scale: [f64; 3],
        name: &str,
    ) -> Result<BoxId, SceneError> {
        self.add(Cuboid::new(loc, rot, scale, name)?)
    }

    pub fn get(&self, id: BoxId) -> Option<&Cuboid> {
        self.boxes.get(id)
    }

    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut Cuboid> {
        self.boxes.get_mut(id)
    }

    pub fn contains(&self, id: BoxId) -> bool {
        self.boxes.contains_key(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<BoxId> {
        self.name_map.get(name).copied()
    }

    /// Iterates over boxes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BoxId, &Cuboid)> {
        self.order.iter().map(|&id| (id, &self.boxes[id]))
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl Index<BoxId> for Scene {
    type Output = Cuboid;

    fn index(&self, id: BoxId) -> &Self::Output {
        &self.boxes[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup_by_id_and_name() {
        let mut scene = Scene::new();
        let a = scene.add_box([0.0; 3], [0.0; 3], [1.0; 3], "a").unwrap();
        let b = scene.add_box([1.0; 3], [0.0; 3], [2.0; 3], "b").unwrap();

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.find_by_name("a"), Some(a));
        assert_eq!(scene.find_by_name("b"), Some(b));
        assert!(scene.find_by_name("c").is_none());
        assert_eq!(scene.get(b).unwrap().scale().x, 2.0);
        assert_eq!(scene[a].name, "a");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut scene = Scene::new();
        scene.add_box([0.0; 3], [0.0; 3], [1.0; 3], "a").unwrap();
        let err = scene.add_box([5.0; 3], [0.0; 3], [1.0; 3], "a").unwrap_err();
        assert_eq!(err, SceneError::DuplicateName("a".to_string()));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn invalid_geometry_is_propagated() {
        let mut scene = Scene::new();
        let err = scene
            .add_box([0.0; 3], [0.0; 3], [0.0, 1.0, 1.0], "bad")
            .unwrap_err();
        assert!(matches!(err, SceneError::Geometry(_)));
        assert!(scene.is_empty());
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut scene = Scene::new();
        for name in ["z", "m", "a"] {
            scene.add_box([0.0; 3], [0.0; 3], [1.0; 3], name).unwrap();
        }
        let names: Vec<_> = scene.iter().map(|(_, c)| c.name.as_str()).collect();
        assert_eq!(names, ["z", "m", "a"]);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut scene = Scene::new();
        let id = scene.add_box([0.0; 3], [0.0; 3], [1.0; 3], "a").unwrap();
        scene.get_mut(id).unwrap().loc.x = 4.0;
        assert_eq!(scene[id].loc.x, 4.0);
    }
}
