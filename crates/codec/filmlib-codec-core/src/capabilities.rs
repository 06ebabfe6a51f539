//! Which optional strip fields a host supports.
//!
//! Older hosts lack some strip properties. Instead of probing each field at
//! every call site, a host reports one [`Capabilities`] value and every
//! optional assignment goes through [`Capabilities::assign`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::{SceneHost, StripProperty, StripRef};
use crate::outcome::{Outcome, SkipReason};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StripField {
    ActionFrameRange,
    Repeat,
    Scale,
    Influence,
    Mute,
    BlendType,
    UseReverse,
}

impl fmt::Display for StripField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StripField::ActionFrameRange => "action_frame_range",
            StripField::Repeat => "repeat",
            StripField::Scale => "scale",
            StripField::Influence => "influence",
            StripField::Mute => "mute",
            StripField::BlendType => "blend_type",
            StripField::UseReverse => "use_reverse",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub action_frame_range: bool,
    pub repeat: bool,
    pub scale: bool,
    pub influence: bool,
    pub mute: bool,
    pub blend_type: bool,
    pub use_reverse: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            action_frame_range: true,
            repeat: true,
            scale: true,
            influence: true,
            mute: true,
            blend_type: true,
            use_reverse: true,
        }
    }

    /// Placement only: strips can be created but carry no extra fields.
    pub fn none() -> Self {
        Self {
            action_frame_range: false,
            repeat: false,
            scale: false,
            influence: false,
            mute: false,
            blend_type: false,
            use_reverse: false,
        }
    }

    pub fn without(mut self, field: StripField) -> Self {
        *self.flag_mut(field) = false;
        self
    }

    pub fn supports(&self, field: StripField) -> bool {
        match field {
            StripField::ActionFrameRange => self.action_frame_range,
            StripField::Repeat => self.repeat,
            StripField::Scale => self.scale,
            StripField::Influence => self.influence,
            StripField::Mute => self.mute,
            StripField::BlendType => self.blend_type,
            StripField::UseReverse => self.use_reverse,
        }
    }

    fn flag_mut(&mut self, field: StripField) -> &mut bool {
        match field {
            StripField::ActionFrameRange => &mut self.action_frame_range,
            StripField::Repeat => &mut self.repeat,
            StripField::Scale => &mut self.scale,
            StripField::Influence => &mut self.influence,
            StripField::Mute => &mut self.mute,
            StripField::BlendType => &mut self.blend_type,
            StripField::UseReverse => &mut self.use_reverse,
        }
    }

    /// Assign `property` on `target` if this host supports it.
    /// Unsupported fields are skipped, host refusals are reported as failures.
    pub fn assign<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        target: StripRef<'_>,
        property: &StripProperty,
    ) -> Outcome<()> {
        if let Some(field) = property.field() {
            if !self.supports(field) {
                return Outcome::Skipped(SkipReason::Unsupported(field));
            }
        }
        host.set_strip_property(target, property).into()
    }
}
