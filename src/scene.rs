//! Scene, asset and presentation boundary
//!
//! The simulation never talks to a renderer, a DOM or a file loader
//! directly. Hosts implement these traits; the headless implementations here
//! back the native runner and the tests.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use glam::{Quat, Vec3};

use crate::error::GameError;
use crate::sim::{Aabb, BoundsSource, CameraView, Collectible, Shape};

/// Opaque handle to a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u32);

/// Opaque handle to a loaded asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u32);

/// What a scene object looks like
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneShape {
    /// The player's ball; radius changes through [`SceneBackend::set_ball_radius`]
    Ball { radius: f32 },
    /// Square ground plane
    Ground { size: f32 },
    Collectible(Shape),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Appearance {
    /// 0xRRGGBB
    pub color: u32,
    pub texture: Option<AssetHandle>,
}

/// Rendering collaborator
pub trait SceneBackend {
    fn create_object(
        &mut self,
        shape: SceneShape,
        transform: Transform,
        appearance: Appearance,
    ) -> ObjectHandle;

    fn remove_object(&mut self, handle: ObjectHandle);

    /// World-space bounding box, `None` for unknown handles
    fn bounding_volume(&self, handle: ObjectHandle) -> Option<Aabb>;

    fn set_transform(&mut self, handle: ObjectHandle, position: Vec3, rotation: Quat);

    fn set_ball_radius(&mut self, handle: ObjectHandle, radius: f32);

    fn set_camera(&mut self, view: CameraView);

    /// Show a collection flash
    fn add_flash(&mut self, id: u32, position: Vec3, color: u32);

    fn remove_flash(&mut self, id: u32);

    fn render_frame(&mut self);
}

/// Presentation collaborator; fire-and-forget
pub trait GameObserver {
    fn on_score_changed(&mut self, score: u64);
    fn on_game_ended(&mut self, final_score: u64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    pub kind: AssetKind,
    pub path: String,
}

impl AssetRequest {
    pub fn texture(path: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Texture,
            path: path.into(),
        }
    }
}

/// Asset loading collaborator; failures abort round setup
pub trait AssetLoader {
    fn load(&mut self, request: &AssetRequest) -> Result<AssetHandle, GameError>;
}

/// Bounding volumes queried from the scene, keyed by collectible id
pub struct SceneBounds<'a, S: SceneBackend> {
    pub scene: &'a S,
    pub handles: &'a HashMap<u32, ObjectHandle>,
}

impl<S: SceneBackend> BoundsSource for SceneBounds<'_, S> {
    fn collectible_bounds(&self, collectible: &Collectible) -> Option<Aabb> {
        self.handles
            .get(&collectible.id)
            .and_then(|handle| self.scene.bounding_volume(*handle))
            .or_else(|| Some(collectible.bounds()))
    }
}

/// Object held by [`HeadlessScene`]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub shape: SceneShape,
    pub transform: Transform,
    pub appearance: Appearance,
}

impl SceneObject {
    fn bounds(&self) -> Aabb {
        let half = match self.shape {
            SceneShape::Ball { radius } => Vec3::splat(radius),
            SceneShape::Ground { size } => Vec3::new(size * 0.5, 0.0, size * 0.5),
            SceneShape::Collectible(shape) => shape.half_extents(),
        };
        Aabb::from_center_half_extents(self.transform.position, half)
    }
}

/// In-memory scene with no rendering
#[derive(Debug, Default)]
pub struct HeadlessScene {
    objects: HashMap<ObjectHandle, SceneObject>,
    flashes: HashMap<u32, (Vec3, u32)>,
    camera: Option<CameraView>,
    frames_rendered: u64,
    next_handle: u32,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn flash_count(&self) -> usize {
        self.flashes.len()
    }

    pub fn camera(&self) -> Option<CameraView> {
        self.camera
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl SceneBackend for HeadlessScene {
    fn create_object(
        &mut self,
        shape: SceneShape,
        transform: Transform,
        appearance: Appearance,
    ) -> ObjectHandle {
        self.next_handle += 1;
        let handle = ObjectHandle(self.next_handle);
        self.objects.insert(
            handle,
            SceneObject {
                shape,
                transform,
                appearance,
            },
        );
        handle
    }

    fn remove_object(&mut self, handle: ObjectHandle) {
        if self.objects.remove(&handle).is_none() {
            log::warn!("Removing unknown scene object {:?}", handle);
        }
    }

    fn bounding_volume(&self, handle: ObjectHandle) -> Option<Aabb> {
        self.objects.get(&handle).map(SceneObject::bounds)
    }

    fn set_transform(&mut self, handle: ObjectHandle, position: Vec3, rotation: Quat) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.transform = Transform { position, rotation };
        }
    }

    fn set_ball_radius(&mut self, handle: ObjectHandle, radius: f32) {
        if let Some(object) = self.objects.get_mut(&handle) {
            if let SceneShape::Ball { radius: r } = &mut object.shape {
                *r = radius;
            }
        }
    }

    fn set_camera(&mut self, view: CameraView) {
        self.camera = Some(view);
    }

    fn add_flash(&mut self, id: u32, position: Vec3, color: u32) {
        self.flashes.insert(id, (position, color));
    }

    fn remove_flash(&mut self, id: u32) {
        self.flashes.remove(&id);
    }

    fn render_frame(&mut self) {
        self.frames_rendered += 1;
    }
}

/// Observer that remembers every notification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingObserver {
    pub scores: Vec<u64>,
    pub final_scores: Vec<u64>,
}

impl GameObserver for RecordingObserver {
    fn on_score_changed(&mut self, score: u64) {
        self.scores.push(score);
    }

    fn on_game_ended(&mut self, final_score: u64) {
        self.final_scores.push(final_score);
    }
}

/// Observer that writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl GameObserver for LogObserver {
    fn on_score_changed(&mut self, score: u64) {
        log::info!("Score: {score}");
    }

    fn on_game_ended(&mut self, final_score: u64) {
        log::info!("Game over! Final score: {final_score}");
    }
}

/// Loader that knows a fixed set of asset paths
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    known: Option<HashSet<String>>,
    loaded: Vec<AssetRequest>,
}

impl StaticAssets {
    /// Every request succeeds
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Only the listed paths load; anything else fails
    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            known: Some(paths.into_iter().map(Into::into).collect()),
            loaded: Vec::new(),
        }
    }

    pub fn loaded(&self) -> &[AssetRequest] {
        &self.loaded
    }
}

impl AssetLoader for StaticAssets {
    fn load(&mut self, request: &AssetRequest) -> Result<AssetHandle, GameError> {
        if let Some(known) = &self.known {
            if !known.contains(&request.path) {
                return Err(GameError::asset_load(&request.path, "unknown asset"));
            }
        }
        self.loaded.push(request.clone());
        Ok(AssetHandle(self.loaded.len() as u32))
    }
}

/// Loader that checks assets exist under a root directory
#[derive(Debug, Clone)]
pub struct FileAssets {
    root: PathBuf,
    next_handle: u32,
}

impl FileAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            next_handle: 0,
        }
    }
}

impl AssetLoader for FileAssets {
    fn load(&mut self, request: &AssetRequest) -> Result<AssetHandle, GameError> {
        let path = self.root.join(&request.path);
        let metadata = std::fs::metadata(&path)
            .map_err(|e| GameError::asset_load(path.display().to_string(), e.to_string()))?;
        if !metadata.is_file() {
            return Err(GameError::asset_load(
                path.display().to_string(),
                "not a file",
            ));
        }
        self.next_handle += 1;
        log::debug!("Loaded {:?} {}", request.kind, path.display());
        Ok(AssetHandle(self.next_handle))
    }
}
