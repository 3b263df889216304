use std::{error, fmt};

/// Unified error type
///
/// Construction errors (`InvalidParentIndex`, `EmptySequence` etc.) mean the
/// input data is malformed and nothing was built. Curve view errors
/// (`NotStepCurve`, `NotLinearCurve`, `SplineUnsupported`) are contract
/// violations by the caller. `SingularMatrix` is returned before any state is
/// changed.
#[derive(Debug)]
pub enum RhError {
    InvalidParentIndex { node: usize, parent: usize },
    InvalidNodeIndex(usize),
    EmptySequence,
    UnsortedKeys,
    LengthMismatch { expected: usize, found: usize },
    InvalidInterval,
    NotStepCurve,
    NotLinearCurve,
    SplineUnsupported,
    SingularMatrix(usize),
    SerdeYamlError(Box<serde_yaml::Error>),
}

impl error::Error for RhError {}

impl fmt::Display for RhError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidParentIndex { node, parent } => {
                write!(
                    f,
                    "node {node} has parent index {parent} which is not \
                     less than its own index"
                )
            }
            Self::InvalidNodeIndex(a) => {
                write!(f, "node index {a} is out of range")
            }
            Self::EmptySequence => {
                write!(f, "keyframe sequence must contain at least one key")
            }
            Self::UnsortedKeys => {
                write!(f, "keyframe times must be in ascending order")
            }
            Self::LengthMismatch { expected, found } => {
                write!(
                    f,
                    "array length mismatch, expected {expected} found {found}"
                )
            }
            Self::InvalidInterval => {
                write!(f, "segment interval must be positive and finite")
            }
            Self::NotStepCurve => {
                write!(f, "sampler does not use step interpolation")
            }
            Self::NotLinearCurve => {
                write!(f, "sampler does not use linear interpolation")
            }
            Self::SplineUnsupported => {
                write!(f, "cubic spline interpolation is not supported")
            }
            Self::SingularMatrix(a) => {
                write!(f, "parent world matrix of node {a} is not invertible")
            }
            Self::SerdeYamlError(e) => {
                write!(f, "serde_yaml::Error: {e}")
            }
        }
    }
}

impl From<serde_yaml::Error> for RhError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::SerdeYamlError(Box::new(e))
    }
}
