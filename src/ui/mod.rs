/// UI module
///
/// This module handles presentation:
/// - Two-phase fade visibility for overlays (fade.rs)
/// - The result gallery grid (gallery.rs)
/// - The preview modal and the multi-image slider (viewer.rs)
///
/// View code here never mutates state; it only emits messages.

pub mod fade;
pub mod gallery;
pub mod viewer;
