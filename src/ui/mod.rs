/// UI layer: thin egui adapters over [`crate::state::AppState`].
///
/// The panels collect user selections and hand them to the state as plain
/// values; the plots only read the cached pipeline outputs.
pub mod panels;
pub mod plot;
