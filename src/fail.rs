// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use ::std::{error, fmt};

//==============================================================================
// Structures
//==============================================================================

/// Operation failure, carrying the errno that classifies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fail {
    /// Error code.
    pub errno: i32,
    /// Cause of the failure.
    pub cause: &'static str,
}

//==============================================================================
// Associated Functions
//==============================================================================

/// Associated functions for failures.
impl Fail {
    /// Creates a new failure.
    pub fn new(errno: i32, cause: &'static str) -> Self {
        Self { errno, cause }
    }
}

//==============================================================================
// Trait Implementations
//==============================================================================

impl error::Error for Fail {}

impl fmt::Display for Fail {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (errno {})", self.cause, self.errno)
    }
}
