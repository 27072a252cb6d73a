/// Presentation helpers for the map and its side panel.
///
/// Submodules:
/// - `color`  — temperature → gradient color.
/// - `legend` — ordered per-region rows for the side panel.

pub mod color;
pub mod legend;
