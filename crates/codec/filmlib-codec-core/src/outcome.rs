//! Per-unit results. Loops over points, strips and objects collect these
//! instead of aborting on the first problem.

use crate::capabilities::StripField;
use crate::error::CodecError;

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The host does not expose this strip field.
    Unsupported(StripField),
    /// The target object is not in the current scene.
    MissingObject(String),
    /// Nothing to do for this unit.
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Applied(T),
    Skipped(SkipReason),
    Failed(CodecError),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(v) => Some(v),
            _ => None,
        }
    }
}

impl<T, E: Into<CodecError>> From<Result<T, E>> for Outcome<T> {
    fn from(r: Result<T, E>) -> Self {
        match r {
            Ok(v) => Outcome::Applied(v),
            Err(e) => Outcome::Failed(e.into()),
        }
    }
}
