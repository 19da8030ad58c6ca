//! Closed symbol vocabularies used by the scripting surface.
//!
//! Each enum decodes from its symbol token once, at the dispatch boundary, and
//! reports [`StagehandError::UnknownEnumValue`] for anything outside the set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StagehandError;

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// Perspective projection.
    #[default]
    Perspective,
    /// Orthographic projection.
    Orthographic,
}

/// Hardware framebuffer targets for drawing and reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BufferTarget {
    #[default]
    Back,
    BackRight,
    BackLeft,
    Front,
    FrontRight,
    FrontLeft,
    Right,
    Left,
    FrontAndBack,
    None,
}

impl BufferTarget {
    /// All targets, in token order.
    pub const ALL: [BufferTarget; 10] = [
        BufferTarget::Back,
        BufferTarget::BackRight,
        BufferTarget::BackLeft,
        BufferTarget::Front,
        BufferTarget::FrontRight,
        BufferTarget::FrontLeft,
        BufferTarget::Right,
        BufferTarget::Left,
        BufferTarget::FrontAndBack,
        BufferTarget::None,
    ];

    /// Returns the symbol token for this target.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            BufferTarget::Back => "back",
            BufferTarget::BackRight => "back-right",
            BufferTarget::BackLeft => "back-left",
            BufferTarget::Front => "front",
            BufferTarget::FrontRight => "front-right",
            BufferTarget::FrontLeft => "front-left",
            BufferTarget::Right => "right",
            BufferTarget::Left => "left",
            BufferTarget::FrontAndBack => "front-and-back",
            BufferTarget::None => "none",
        }
    }
}

impl FromStr for BufferTarget {
    type Err = StagehandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|target| target.token() == s)
            .ok_or_else(|| StagehandError::UnknownEnumValue {
                kind: "buffer target",
                token: s.to_string(),
            })
    }
}

/// Stereo rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StereoMode {
    /// Mono rendering.
    #[default]
    #[serde(rename = "no-stereo")]
    None,
    /// Quad-buffered shutter glasses; needs a stereo-capable output.
    #[serde(rename = "crystal-eyes")]
    CrystalEyes,
    /// Anaglyph stereo through the colour mask.
    #[serde(rename = "colour")]
    ColourStereo,
}

impl StereoMode {
    /// Returns the symbol token for this mode.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            StereoMode::None => "no-stereo",
            StereoMode::CrystalEyes => "crystal-eyes",
            StereoMode::ColourStereo => "colour",
        }
    }
}

impl FromStr for StereoMode {
    type Err = StagehandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no-stereo" => Ok(StereoMode::None),
            "crystal-eyes" => Ok(StereoMode::CrystalEyes),
            "colour" => Ok(StereoMode::ColourStereo),
            _ => Err(StagehandError::UnknownEnumValue {
                kind: "stereo mode",
                token: s.to_string(),
            }),
        }
    }
}

/// Accumulation buffer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccumOp {
    Accum,
    Load,
    Return,
    Add,
    Mult,
}

impl AccumOp {
    /// Returns the symbol token for this operation.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            AccumOp::Accum => "accum",
            AccumOp::Load => "load",
            AccumOp::Return => "return",
            AccumOp::Add => "add",
            AccumOp::Mult => "mult",
        }
    }
}

impl FromStr for AccumOp {
    type Err = StagehandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accum" => Ok(AccumOp::Accum),
            "load" => Ok(AccumOp::Load),
            "return" => Ok(AccumOp::Return),
            "add" => Ok(AccumOp::Add),
            "mult" => Ok(AccumOp::Mult),
            _ => Err(StagehandError::UnknownEnumValue {
                kind: "accum op",
                token: s.to_string(),
            }),
        }
    }
}

macro_rules! display_token {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        })*
    };
}

display_token!(BufferTarget, StereoMode, AccumOp);
