// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene graph: nodes, drawables, lights, fog, background.

use crate::resources::{GeometryHandle, MaterialHandle};
use glam::{Mat3, Mat4, Quat, Vec3};

/// Linear-space RGB color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red, `[0, 1]`.
    pub r: f32,
    /// Green, `[0, 1]`.
    pub g: f32,
    /// Blue, `[0, 1]`.
    pub b: f32,
}

impl Color {
    /// Black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    /// White.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// From a packed `0xRRGGBB` value.
    pub fn from_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
        }
    }

    /// As `[r, g, b]`.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Linear distance fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    /// Fog color, usually the background.
    pub color: Color,
    /// Distance where fog starts.
    pub near: f32,
    /// Distance where fog fully covers.
    pub far: f32,
}

/// Light sources a scene can hold.
#[derive(Clone, Copy, Debug)]
pub enum Light {
    /// Directional light shining from `position` toward the origin.
    Directional {
        /// Position the direction is derived from.
        position: Vec3,
        /// Light color.
        color: Color,
        /// Intensity multiplier.
        intensity: f32,
        /// Whether this light casts shadows (honored only by backends that
        /// build a shadow pass).
        cast_shadow: bool,
    },
    /// Non-directional fill light.
    Ambient {
        /// Light color.
        color: Color,
        /// Intensity multiplier.
        intensity: f32,
    },
}

/// Local transform: translation, rotation, scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Position.
    pub translation: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Translation-only transform.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Local matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Rotate so local +Z points from the current translation toward
    /// `target` (scene-object convention).
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.translation).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let x = up.cross(forward).normalize_or_zero();
        if x == Vec3::ZERO {
            // Degenerate: forward parallel to up.
            return;
        }
        let y = forward.cross(x);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(x, y, forward));
    }
}

/// Identifier of a node within one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// What a node contributes to the frame.
#[derive(Clone, Copy, Debug)]
pub enum Drawable {
    /// Triangle mesh drawn with a material.
    Mesh {
        /// Geometry handle.
        geometry: GeometryHandle,
        /// Material handle.
        material: MaterialHandle,
    },
    /// Raw-buffer point cloud drawn with a material.
    Points {
        /// Geometry handle; must be a `PointCloud`.
        geometry: GeometryHandle,
        /// Material handle.
        material: MaterialHandle,
    },
    /// Light source.
    Light(Light),
    /// Pure transform parent for other nodes.
    Group,
}

/// One scene-graph node.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    /// Local transform.
    pub transform: Transform,
    /// Drawn content.
    pub drawable: Drawable,
    /// Optional parent whose transform composes with this one.
    pub parent: Option<NodeId>,
    /// Skipped by the backend when false.
    pub visible: bool,
}

impl Node {
    /// Mesh node with default transform.
    pub fn mesh(geometry: GeometryHandle, material: MaterialHandle) -> Self {
        Self {
            transform: Transform::IDENTITY,
            drawable: Drawable::Mesh { geometry, material },
            parent: None,
            visible: true,
        }
    }

    /// Point-cloud node with default transform.
    pub fn points(geometry: GeometryHandle, material: MaterialHandle) -> Self {
        Self {
            transform: Transform::IDENTITY,
            drawable: Drawable::Points { geometry, material },
            parent: None,
            visible: true,
        }
    }

    /// Light node.
    pub fn light(light: Light) -> Self {
        Self {
            transform: Transform::IDENTITY,
            drawable: Drawable::Light(light),
            parent: None,
            visible: true,
        }
    }

    /// Empty transform parent.
    pub fn group() -> Self {
        Self {
            transform: Transform::IDENTITY,
            drawable: Drawable::Group,
            parent: None,
            visible: true,
        }
    }

    /// Builder: set the translation.
    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    /// Builder: set the parent.
    pub fn child_of(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Builder: set the full transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// The drawable graph one surface renders each tick.
#[derive(Debug)]
pub struct Scene {
    /// Clear color.
    pub background: Color,
    /// Optional distance fog.
    pub fog: Option<Fog>,
    nodes: Vec<Option<Node>>,
}

// Parent chains in practice are one or two levels; anything deeper than this
// is a cycle introduced by a bug.
const MAX_PARENT_DEPTH: usize = 64;

impl Scene {
    /// Empty scene with a clear color.
    pub fn new(background: Color) -> Self {
        Self {
            background,
            fog: None,
            nodes: Vec::new(),
        }
    }

    /// Insert a node, returning its id.
    pub fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.push(Some(node));
        NodeId(self.nodes.len() as u32 - 1)
    }

    /// Remove a node. Children keep their (now dangling) parent id and
    /// resolve it as identity.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.get_mut(id.0 as usize)?.take()
    }

    /// Look up a live node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    /// Mutable access to a live node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    /// World transform of a node: its local matrix composed with every
    /// ancestor's.
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = Some(id);
        let mut depth = 0;
        while let Some(cur) = cursor {
            let Some(node) = self.get(cur) else { break };
            matrix = node.transform.matrix() * matrix;
            cursor = node.parent;
            depth += 1;
            if depth >= MAX_PARENT_DEPTH {
                break;
            }
        }
        matrix
    }

    /// Iterate live nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|s| s.is_some()).count()
    }

    /// True when no node is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn color_from_hex_unpacks_channels() {
        let c = Color::from_hex(0x202020);
        assert_relative_eq!(c.r, 32.0 / 255.0);
        assert_relative_eq!(c.g, 32.0 / 255.0);
        assert_relative_eq!(c.b, 32.0 / 255.0);
    }

    #[test]
    fn world_transform_composes_parent_chain() {
        let mut scene = Scene::new(Color::BLACK);
        let parent = scene.insert(Node::group().at(Vec3::new(0.0, 5.0, 0.0)));
        let child = scene.insert(
            Node::group()
                .at(Vec3::new(1.0, 0.0, 0.0))
                .child_of(parent),
        );
        let world = scene.world_transform(child);
        let pos = world.transform_point3(Vec3::ZERO);
        assert_relative_eq!(pos.x, 1.0);
        assert_relative_eq!(pos.y, 5.0);
    }

    #[test]
    fn parent_scale_applies_to_children() {
        let mut scene = Scene::new(Color::BLACK);
        let mut group = Node::group();
        group.transform.scale = Vec3::splat(2.0);
        let parent = scene.insert(group);
        let child = scene.insert(Node::group().at(Vec3::X).child_of(parent));
        let pos = scene.world_transform(child).transform_point3(Vec3::ZERO);
        assert_relative_eq!(pos.x, 2.0);
    }

    #[test]
    fn look_at_points_local_z_at_target() {
        let mut t = Transform::from_translation(Vec3::new(3.0, 0.0, 0.0));
        t.look_at(Vec3::ZERO, Vec3::Y);
        let forward = t.rotation * Vec3::Z;
        assert_relative_eq!(forward.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(forward.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(forward.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn removed_nodes_resolve_as_identity_parents() {
        let mut scene = Scene::new(Color::BLACK);
        let parent = scene.insert(Node::group().at(Vec3::splat(9.0)));
        let child = scene.insert(Node::group().at(Vec3::X).child_of(parent));
        scene.remove(parent);
        let pos = scene.world_transform(child).transform_point3(Vec3::ZERO);
        assert_relative_eq!(pos.x, 1.0);
        assert_relative_eq!(pos.y, 0.0);
    }
}
