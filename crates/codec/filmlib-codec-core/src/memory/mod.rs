//! In-memory [`SceneHost`].
//!
//! Holds objects, curve sets, NLA tracks, markers and text blocks in plain
//! maps and evaluates transforms itself (see [`eval`]). Used by the test
//! suites, the bake bench and headless tools that replay library files.

mod eval;

use indexmap::IndexMap;
use nalgebra::Matrix4;
use serde_json::Value as JsonValue;

use filmlib_api_core::{
    BlendType, Interpolation, LiveCurve, LiveCurveSet, LiveKeyframe, MarkerData, TextBlockData,
};

use crate::capabilities::Capabilities;
use crate::error::HostError;
use crate::host::{
    AnimationBinding, LiveStrip, LiveTrack, ObjectInfo, ObjectKind, SceneHost, StripProperty,
    StripRef,
};

use eval::{strip_local_frame, Pose};

/// Parent chains deeper than this are cut off during evaluation.
const MAX_PARENT_DEPTH: usize = 64;
/// Two keyframe frames closer than this are the same key.
const FRAME_EPS: f64 = 1e-6;

#[derive(Clone, Debug)]
struct MemoryObject {
    info: ObjectInfo,
    selected: bool,
    hidden: bool,
    render_hidden: bool,
    rest_location: [f64; 3],
    rest_rotation: [f64; 3],
    rest_scale: [f64; 3],
    animation: Option<AnimationBinding>,
}

impl MemoryObject {
    fn new(info: ObjectInfo) -> Self {
        Self {
            info,
            selected: false,
            hidden: false,
            render_hidden: false,
            rest_location: [0.0; 3],
            rest_rotation: [0.0; 3],
            rest_scale: [1.0; 3],
            animation: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MemoryHost {
    capabilities: Capabilities,
    curve_sets: IndexMap<String, LiveCurveSet>,
    objects: IndexMap<String, MemoryObject>,
    frame_start: i32,
    frame_end: i32,
    current_frame: i32,
    fps: (f64, f64),
    markers: Vec<MarkerData>,
    texts: IndexMap<String, String>,
    active_text: Option<String>,
    /// Number of `set_frame` calls; lets tests check that baking scrubs.
    frame_changes: usize,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Empty scene, frames 1..=250 at 24 fps, every strip field supported.
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::all())
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            curve_sets: IndexMap::new(),
            objects: IndexMap::new(),
            frame_start: 1,
            frame_end: 250,
            current_frame: 1,
            fps: (24.0, 1.0),
            markers: Vec::new(),
            texts: IndexMap::new(),
            active_text: None,
            frame_changes: 0,
        }
    }

    // ----- scene building -----

    /// Add (or replace) an object.
    pub fn add_object(&mut self, name: &str, kind: ObjectKind) -> &mut Self {
        self.objects
            .insert(name.to_string(), MemoryObject::new(ObjectInfo::new(name, kind)));
        self
    }

    pub fn remove_object(&mut self, name: &str) -> bool {
        let removed = self.objects.shift_remove(name).is_some();
        for obj in self.objects.values_mut() {
            if obj.info.parent.as_deref() == Some(name) {
                obj.info.parent = None;
            }
        }
        removed
    }

    pub fn select(&mut self, name: &str, selected: bool) -> &mut Self {
        if let Some(obj) = self.objects.get_mut(name) {
            obj.selected = selected;
        }
        self
    }

    pub fn set_parent(&mut self, child: &str, parent: Option<&str>) -> &mut Self {
        if let Some(obj) = self.objects.get_mut(child) {
            obj.info.parent = parent.map(str::to_string);
        }
        self
    }

    pub fn set_property(&mut self, object: &str, key: &str, value: JsonValue) -> &mut Self {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.info.properties.insert(key.to_string(), value);
        }
        self
    }

    pub fn set_rest_location(&mut self, object: &str, location: [f64; 3]) -> &mut Self {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.rest_location = location;
        }
        self
    }

    pub fn set_rest_rotation(&mut self, object: &str, euler: [f64; 3]) -> &mut Self {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.rest_rotation = euler;
        }
        self
    }

    pub fn set_fps(&mut self, fps: f64, fps_base: f64) -> &mut Self {
        self.fps = (fps, fps_base);
        self
    }

    /// Create `name` with `content` and focus it in the text editor.
    pub fn set_active_text(&mut self, name: &str, content: &str) -> &mut Self {
        self.texts.insert(name.to_string(), content.to_string());
        self.active_text = Some(name.to_string());
        self
    }

    pub fn clear_active_text(&mut self) -> &mut Self {
        self.active_text = None;
        self
    }

    /// Build a curve set from `(data_path, array_index, [(frame, value)])`
    /// rows with LINEAR keys.
    pub fn add_curve_set(
        &mut self,
        name: &str,
        curves: &[(&str, i32, &[(f64, f64)])],
    ) -> Result<(), HostError> {
        self.create_curve_set(name)?;
        for (path, idx, keys) in curves {
            self.add_curve(name, path, *idx)?;
            for (frame, value) in keys.iter() {
                self.insert_keyframe(name, path, *idx, *frame, *value)?;
                self.set_keyframe_interpolation(name, path, *idx, *frame, &Interpolation::Linear)?;
            }
        }
        Ok(())
    }

    // ----- inspection -----

    pub fn is_hidden(&self, object: &str) -> bool {
        self.objects.get(object).is_some_and(|o| o.hidden)
    }

    pub fn is_render_hidden(&self, object: &str) -> bool {
        self.objects.get(object).is_some_and(|o| o.render_hidden)
    }

    pub fn frame_changes(&self) -> usize {
        self.frame_changes
    }

    // ----- internals -----

    fn object_mut(&mut self, name: &str) -> Result<&mut MemoryObject, HostError> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| HostError::ObjectNotFound(name.to_string()))
    }

    fn binding_mut(&mut self, name: &str) -> Result<&mut AnimationBinding, HostError> {
        self.object_mut(name)?
            .animation
            .as_mut()
            .ok_or_else(|| HostError::NoAnimation(name.to_string()))
    }

    fn track_mut(&mut self, object: &str, track: usize) -> Result<&mut LiveTrack, HostError> {
        self.binding_mut(object)?
            .tracks
            .get_mut(track)
            .ok_or_else(|| HostError::TrackOutOfRange {
                object: object.to_string(),
                track,
            })
    }

    fn curve_mut(
        &mut self,
        set: &str,
        data_path: &str,
        array_index: i32,
    ) -> Result<&mut LiveCurve, HostError> {
        let curves = &mut self
            .curve_sets
            .get_mut(set)
            .ok_or_else(|| HostError::CurveSetNotFound(set.to_string()))?
            .curves;
        curves
            .iter_mut()
            .find(|c| c.data_path == data_path && c.array_index == array_index)
            .ok_or_else(|| HostError::CurveNotFound {
                set: set.to_string(),
                data_path: data_path.to_string(),
                array_index,
            })
    }

    /// Hide strip fields this host does not expose.
    fn mask_strip(&self, strip: &LiveStrip) -> LiveStrip {
        let caps = &self.capabilities;
        let mut out = strip.clone();
        if !caps.action_frame_range {
            out.action_frame_start = None;
            out.action_frame_end = None;
        }
        if !caps.repeat {
            out.repeat = None;
        }
        if !caps.scale {
            out.scale = None;
        }
        if !caps.influence {
            out.influence = None;
        }
        if !caps.mute {
            out.mute = None;
        }
        if !caps.blend_type {
            out.blend_type = None;
        }
        if !caps.use_reverse {
            out.use_reverse = None;
        }
        out
    }

    fn pose(&self, obj: &MemoryObject, frame: f64) -> Pose {
        let mut pose = Pose::rest(obj.rest_location, obj.rest_rotation, obj.rest_scale);
        let Some(binding) = &obj.animation else {
            return pose;
        };
        for strip in binding.tracks.iter().flat_map(|t| t.strips.iter()) {
            if strip.mute == Some(true) {
                continue;
            }
            let Some(set) = strip.curve_set.as_ref().and_then(|n| self.curve_sets.get(n)) else {
                continue;
            };
            pose.apply_curve_set(set, strip_local_frame(strip, frame));
        }
        if let Some(set) = binding
            .active_curve_set
            .as_ref()
            .and_then(|n| self.curve_sets.get(n))
        {
            pose.apply_curve_set(set, frame);
        }
        pose
    }

    fn world_at(&self, name: &str, frame: f64, depth: usize) -> Option<Matrix4<f64>> {
        let obj = self.objects.get(name)?;
        let local = self.pose(obj, frame).matrix();
        match obj.info.parent.as_deref() {
            Some(parent) if depth < MAX_PARENT_DEPTH => {
                let parent_world = self
                    .world_at(parent, frame, depth + 1)
                    .unwrap_or_else(Matrix4::identity);
                Some(parent_world * local)
            }
            _ => Some(local),
        }
    }
}

/// Strip end from placement, action range, scale and repeat.
fn recompute_strip_end(strip: &mut LiveStrip) {
    let afs = strip.action_frame_start.unwrap_or(0.0);
    let afe = strip.action_frame_end.unwrap_or(afs);
    let scale = strip.scale.unwrap_or(1.0);
    let repeat = strip.repeat.unwrap_or(1.0);
    let length = (afe - afs) * scale * repeat;
    strip.frame_end = strip.frame_start + length.max(1.0);
}

impl SceneHost for MemoryHost {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn curve_set(&self, name: &str) -> Option<LiveCurveSet> {
        self.curve_sets.get(name).cloned()
    }

    fn curve_set_names(&self) -> Vec<String> {
        self.curve_sets.keys().cloned().collect()
    }

    fn has_curve_set(&self, name: &str) -> bool {
        self.curve_sets.contains_key(name)
    }

    fn create_curve_set(&mut self, name: &str) -> Result<(), HostError> {
        if name.is_empty() {
            return Err(HostError::Rejected("empty curve set name".into()));
        }
        if self.curve_sets.contains_key(name) {
            return Err(HostError::CurveSetExists(name.to_string()));
        }
        self.curve_sets
            .insert(name.to_string(), LiveCurveSet::new(name));
        Ok(())
    }

    fn remove_curve_set(&mut self, name: &str) -> Result<(), HostError> {
        if self.curve_sets.shift_remove(name).is_none() {
            return Err(HostError::CurveSetNotFound(name.to_string()));
        }
        // Users of a removed set lose the reference, as in the host.
        for obj in self.objects.values_mut() {
            let Some(binding) = obj.animation.as_mut() else {
                continue;
            };
            if binding.active_curve_set.as_deref() == Some(name) {
                binding.active_curve_set = None;
            }
            for strip in binding.tracks.iter_mut().flat_map(|t| t.strips.iter_mut()) {
                if strip.curve_set.as_deref() == Some(name) {
                    strip.curve_set = None;
                }
            }
        }
        Ok(())
    }

    fn add_curve(&mut self, set: &str, data_path: &str, array_index: i32) -> Result<(), HostError> {
        let curves = &mut self
            .curve_sets
            .get_mut(set)
            .ok_or_else(|| HostError::CurveSetNotFound(set.to_string()))?
            .curves;
        if curves
            .iter()
            .any(|c| c.data_path == data_path && c.array_index == array_index)
        {
            return Err(HostError::Rejected(format!(
                "curve {data_path}[{array_index}] already exists in {set}"
            )));
        }
        curves.push(LiveCurve {
            data_path: data_path.to_string(),
            array_index,
            keyframes: Vec::new(),
        });
        Ok(())
    }

    fn insert_keyframe(
        &mut self,
        set: &str,
        data_path: &str,
        array_index: i32,
        frame: f64,
        value: f64,
    ) -> Result<(), HostError> {
        if !frame.is_finite() || !value.is_finite() {
            return Err(HostError::Rejected(format!(
                "non-finite keyframe ({frame}, {value})"
            )));
        }
        let curve = self.curve_mut(set, data_path, array_index)?;
        match curve
            .keyframes
            .iter_mut()
            .find(|k| (k.frame - frame).abs() < FRAME_EPS)
        {
            Some(existing) => existing.value = value,
            None => {
                let at = curve.keyframes.partition_point(|k| k.frame < frame);
                curve.keyframes.insert(
                    at,
                    LiveKeyframe {
                        frame,
                        value,
                        interpolation: Interpolation::default(),
                    },
                );
            }
        }
        Ok(())
    }

    fn set_keyframe_interpolation(
        &mut self,
        set: &str,
        data_path: &str,
        array_index: i32,
        frame: f64,
        interpolation: &Interpolation,
    ) -> Result<(), HostError> {
        if let Interpolation::Other(name) = interpolation {
            return Err(HostError::Rejected(format!("unknown interpolation {name}")));
        }
        let curve = self.curve_mut(set, data_path, array_index)?;
        let key = curve
            .keyframes
            .iter_mut()
            .find(|k| (k.frame - frame).abs() < FRAME_EPS)
            .ok_or_else(|| HostError::Rejected(format!("no keyframe at frame {frame}")))?;
        key.interpolation = interpolation.clone();
        Ok(())
    }

    fn object_names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    fn selected_object_names(&self) -> Vec<String> {
        self.objects
            .values()
            .filter(|o| o.selected)
            .map(|o| o.info.name.clone())
            .collect()
    }

    fn object(&self, name: &str) -> Option<ObjectInfo> {
        self.objects.get(name).map(|o| o.info.clone())
    }

    fn animation(&self, object: &str) -> Option<AnimationBinding> {
        let binding = self.objects.get(object)?.animation.as_ref()?;
        Some(AnimationBinding {
            active_curve_set: binding.active_curve_set.clone(),
            tracks: binding
                .tracks
                .iter()
                .map(|t| LiveTrack {
                    name: t.name.clone(),
                    strips: t.strips.iter().map(|s| self.mask_strip(s)).collect(),
                })
                .collect(),
        })
    }

    fn ensure_animation(&mut self, object: &str) -> Result<(), HostError> {
        let obj = self.object_mut(object)?;
        obj.animation.get_or_insert_with(AnimationBinding::default);
        Ok(())
    }

    fn clear_animation(&mut self, object: &str) -> Result<(), HostError> {
        self.object_mut(object)?.animation = None;
        Ok(())
    }

    fn set_active_curve_set(&mut self, object: &str, name: Option<&str>) -> Result<(), HostError> {
        let Some(name) = name else {
            if let Some(binding) = self.object_mut(object)?.animation.as_mut() {
                binding.active_curve_set = None;
            }
            return Ok(());
        };
        if !self.curve_sets.contains_key(name) {
            return Err(HostError::CurveSetNotFound(name.to_string()));
        }
        self.binding_mut(object)?.active_curve_set = Some(name.to_string());
        Ok(())
    }

    fn new_track(&mut self, object: &str, name: &str) -> Result<usize, HostError> {
        let tracks = &mut self.binding_mut(object)?.tracks;
        tracks.push(LiveTrack {
            name: name.to_string(),
            strips: Vec::new(),
        });
        Ok(tracks.len() - 1)
    }

    fn remove_track(&mut self, object: &str, track: usize) -> Result<(), HostError> {
        let tracks = &mut self.binding_mut(object)?.tracks;
        if track >= tracks.len() {
            return Err(HostError::TrackOutOfRange {
                object: object.to_string(),
                track,
            });
        }
        tracks.remove(track);
        Ok(())
    }

    fn new_strip(
        &mut self,
        object: &str,
        track: usize,
        name: &str,
        start: i32,
        curve_set: Option<&str>,
    ) -> Result<usize, HostError> {
        let range = match curve_set {
            Some(set) => Some(
                self.curve_sets
                    .get(set)
                    .ok_or_else(|| HostError::CurveSetNotFound(set.to_string()))?
                    .frame_range(),
            ),
            None => None,
        };
        let [afs, afe] = range.unwrap_or([1.0, 1.0]);
        let mut strip = LiveStrip {
            name: name.to_string(),
            frame_start: f64::from(start),
            frame_end: f64::from(start),
            curve_set: curve_set.map(str::to_string),
            action_frame_start: Some(afs),
            action_frame_end: Some(afe),
            repeat: Some(1.0),
            scale: Some(1.0),
            influence: Some(1.0),
            mute: Some(false),
            blend_type: Some(BlendType::Replace),
            use_reverse: Some(false),
        };
        recompute_strip_end(&mut strip);
        let strips = &mut self.track_mut(object, track)?.strips;
        strips.push(strip);
        Ok(strips.len() - 1)
    }

    fn remove_strip(&mut self, object: &str, track: usize, strip: usize) -> Result<(), HostError> {
        let strips = &mut self.track_mut(object, track)?.strips;
        if strip >= strips.len() {
            return Err(HostError::StripOutOfRange {
                object: object.to_string(),
                track,
                strip,
            });
        }
        strips.remove(strip);
        Ok(())
    }

    fn set_strip_property(
        &mut self,
        target: StripRef<'_>,
        property: &StripProperty,
    ) -> Result<(), HostError> {
        if let Some(field) = property.field() {
            if !self.capabilities.supports(field) {
                return Err(HostError::Unsupported("strip field"));
            }
        }
        if let StripProperty::CurveSet(name) = property {
            if !self.curve_sets.contains_key(name) {
                return Err(HostError::CurveSetNotFound(name.clone()));
            }
        }
        let StripRef {
            object,
            track,
            strip,
        } = target;
        let strip = self
            .track_mut(object, track)?
            .strips
            .get_mut(strip)
            .ok_or_else(|| HostError::StripOutOfRange {
                object: object.to_string(),
                track,
                strip,
            })?;
        match property {
            StripProperty::CurveSet(name) => strip.curve_set = Some(name.clone()),
            StripProperty::ActionFrameStart(v) => strip.action_frame_start = Some(*v),
            StripProperty::ActionFrameEnd(v) => strip.action_frame_end = Some(*v),
            StripProperty::Repeat(v) => strip.repeat = Some(*v),
            StripProperty::Scale(v) => {
                if !v.is_finite() || *v <= 0.0 {
                    return Err(HostError::Rejected(format!("strip scale {v}")));
                }
                strip.scale = Some(*v);
            }
            StripProperty::Influence(v) => strip.influence = Some(v.clamp(0.0, 1.0)),
            StripProperty::Mute(v) => strip.mute = Some(*v),
            StripProperty::BlendType(b) => {
                if let BlendType::Other(name) = b {
                    return Err(HostError::Rejected(format!("unknown blend type {name}")));
                }
                strip.blend_type = Some(b.clone());
            }
            StripProperty::UseReverse(v) => strip.use_reverse = Some(*v),
        }
        recompute_strip_end(strip);
        Ok(())
    }

    fn frame_range(&self) -> Result<(i32, i32), HostError> {
        Ok((self.frame_start, self.frame_end))
    }

    fn set_frame_start(&mut self, frame: i32) -> Result<(), HostError> {
        self.frame_start = frame;
        self.frame_end = self.frame_end.max(frame);
        Ok(())
    }

    fn set_frame_end(&mut self, frame: i32) -> Result<(), HostError> {
        self.frame_end = frame;
        self.frame_start = self.frame_start.min(frame);
        Ok(())
    }

    fn current_frame(&self) -> i32 {
        self.current_frame
    }

    fn set_frame(&mut self, frame: i32) -> Result<(), HostError> {
        // Evaluation is lazy; `world_matrix` always reads the current frame.
        self.current_frame = frame;
        self.frame_changes += 1;
        Ok(())
    }

    fn fps(&self) -> (f64, f64) {
        self.fps
    }

    fn world_matrix(&self, object: &str) -> Option<Matrix4<f64>> {
        self.world_at(object, f64::from(self.current_frame), 0)
    }

    fn timeline_markers(&self) -> Vec<MarkerData> {
        self.markers.clone()
    }

    fn clear_markers(&mut self) -> Result<(), HostError> {
        self.markers.clear();
        Ok(())
    }

    fn add_marker(&mut self, name: &str, frame: i32) -> Result<(), HostError> {
        self.markers.push(MarkerData::new(name, frame));
        Ok(())
    }

    fn active_text(&self) -> Option<TextBlockData> {
        let name = self.active_text.as_ref()?;
        let content = self.texts.get(name)?;
        Some(TextBlockData::new(name.clone(), content.clone()))
    }

    fn text(&self, name: &str) -> Option<String> {
        self.texts.get(name).cloned()
    }

    fn write_text(&mut self, name: &str, content: &str) -> Result<(), HostError> {
        if name.is_empty() {
            return Err(HostError::Rejected("empty text block name".into()));
        }
        self.texts.insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn set_hidden(&mut self, object: &str, hidden: bool) -> Result<(), HostError> {
        self.object_mut(object)?.hidden = hidden;
        Ok(())
    }

    fn set_render_hidden(&mut self, object: &str, hidden: bool) -> Result<(), HostError> {
        self.object_mut(object)?.render_hidden = hidden;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scene() -> MemoryHost {
        let mut host = MemoryHost::new();
        host.add_object("Cube", ObjectKind::Mesh);
        host.add_curve_set("Move", &[("location", 0, &[(0.0, 0.0), (10.0, 10.0)])])
            .unwrap();
        host
    }

    #[test]
    fn removing_a_set_clears_its_users() {
        let mut host = scene();
        host.ensure_animation("Cube").unwrap();
        host.set_active_curve_set("Cube", Some("Move")).unwrap();
        let t = host.new_track("Cube", "T").unwrap();
        host.new_strip("Cube", t, "S", 1, Some("Move")).unwrap();
        host.remove_curve_set("Move").unwrap();
        let binding = host.animation("Cube").unwrap();
        assert!(binding.active_curve_set.is_none());
        assert!(binding.tracks[0].strips[0].curve_set.is_none());
    }

    #[test]
    fn strip_end_follows_scale() {
        let mut host = scene();
        host.ensure_animation("Cube").unwrap();
        let t = host.new_track("Cube", "T").unwrap();
        let s = host.new_strip("Cube", t, "S", 10, Some("Move")).unwrap();
        let target = StripRef {
            object: "Cube",
            track: t,
            strip: s,
        };
        host.set_strip_property(target, &StripProperty::Scale(2.0))
            .unwrap();
        let strip = &host.animation("Cube").unwrap().tracks[0].strips[0];
        assert_relative_eq!(strip.frame_end, 30.0);
    }

    #[test]
    fn unsupported_fields_are_hidden_and_refused() {
        let caps = Capabilities::all().without(crate::StripField::UseReverse);
        let mut host = MemoryHost::with_capabilities(caps);
        host.add_object("Cube", ObjectKind::Mesh);
        host.ensure_animation("Cube").unwrap();
        let t = host.new_track("Cube", "T").unwrap();
        let s = host.new_strip("Cube", t, "S", 1, None).unwrap();
        let target = StripRef {
            object: "Cube",
            track: t,
            strip: s,
        };
        assert!(host
            .set_strip_property(target, &StripProperty::UseReverse(true))
            .is_err());
        let strip = &host.animation("Cube").unwrap().tracks[0].strips[0];
        assert_eq!(strip.use_reverse, None);
        assert_eq!(strip.repeat, Some(1.0));
    }

    #[test]
    fn world_matrix_follows_strip_and_parent() {
        let mut host = scene();
        host.add_object("Root", ObjectKind::Empty);
        host.set_rest_location("Root", [0.0, 0.0, 5.0]);
        host.set_parent("Cube", Some("Root"));
        host.ensure_animation("Cube").unwrap();
        let t = host.new_track("Cube", "T").unwrap();
        host.new_strip("Cube", t, "S", 0, Some("Move")).unwrap();
        host.set_frame(5).unwrap();
        let m = host.world_matrix("Cube").unwrap();
        assert_relative_eq!(m[(0, 3)], 5.0);
        assert_relative_eq!(m[(2, 3)], 5.0);
    }

    #[test]
    fn keyframes_stay_sorted_and_replace_on_same_frame() {
        let mut host = scene();
        host.insert_keyframe("Move", "location", 0, 5.0, 1.0).unwrap();
        host.insert_keyframe("Move", "location", 0, 10.0, 7.0).unwrap();
        let set = host.curve_set("Move").unwrap();
        let frames: Vec<_> = set.curves[0].keyframes.iter().map(|k| k.frame).collect();
        assert_eq!(frames, vec![0.0, 5.0, 10.0]);
        assert_relative_eq!(set.curves[0].keyframes[2].value, 7.0);
    }

    #[test]
    fn frame_range_keeps_start_before_end() {
        let mut host = MemoryHost::new();
        host.set_frame_start(300).unwrap();
        assert_eq!(host.frame_range().unwrap(), (300, 300));
        host.set_frame_end(10).unwrap();
        assert_eq!(host.frame_range().unwrap(), (10, 10));
    }
}
