//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Extraction error - an image reference or container entry was rejected
pub const EXTRACT_ERROR: i32 = 2;

/// Patch error - canonicalized images could not be written back
pub const PATCH_ERROR: i32 = 3;

/// Manifest error - input is not a valid JSON or YAML manifest
pub const MANIFEST_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
