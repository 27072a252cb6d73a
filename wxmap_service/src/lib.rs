/// Regional weather map service.
///
/// Colors administrative boundary features by the current temperature of
/// the canonical region they belong to:
///
/// 1. fetch per-region readings (`ingest`) into a `snapshot::WeatherSnapshot`;
/// 2. resolve each boundary feature's free-text name to a region
///    (`regions::RegionResolver`);
/// 3. map that region's temperature onto the snapshot's min-max gradient
///    (`shading::color`), and build the side-panel legend
///    (`shading::legend`).

pub mod config;
pub mod geo;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod regions;
pub mod shading;
pub mod snapshot;
