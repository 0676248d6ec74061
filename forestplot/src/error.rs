// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors and non-fatal warnings.

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// Errors returned by fallible entry points (ingestion and export).
///
/// The layout engine itself never fails: degenerate domains, missing text
/// metrics and unknown element types all degrade gracefully. Only structural
/// problems with the input specification are errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForestError {
    /// The specification is structurally invalid (a required object or array is missing).
    InvalidSpecification {
        /// Dotted path of the offending member, e.g. `data.rows`.
        path: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl ForestError {
    /// Convenience constructor for [`ForestError::InvalidSpecification`].
    pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpecification {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ForestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpecification { path, reason } => {
                write!(f, "invalid forest plot specification: `{path}` {reason}")
            }
        }
    }
}

impl core::error::Error for ForestError {}

/// A non-fatal problem found while laying out a plot.
///
/// The offending element is skipped and layout continues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// A column declared a rendering type this engine does not know.
    UnknownColumnType {
        /// Column id.
        column: String,
        /// The declared type name.
        kind: String,
    },
    /// An annotation declared a type this engine does not know.
    UnknownAnnotationType {
        /// Index of the annotation in the specification.
        index: usize,
        /// The declared type name.
        kind: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumnType { column, kind } => {
                write!(f, "column `{column}` has unknown type `{kind}`; skipped")
            }
            Self::UnknownAnnotationType { index, kind } => {
                write!(f, "annotation #{index} has unknown type `{kind}`; skipped")
            }
        }
    }
}
