//! Rendering several papers at once.
//!
//! Every paper gets its own canvas and render state, so papers can be laid
//! out on separate threads with nothing shared but the read-only director.

use crate::director::{PaginationDirector, RenderedPaper};
use crate::error::EngineError;
use crate::model::PaperBundle;

#[cfg(feature = "rayon-executor")]
use rayon::prelude::*;

/// Renders each bundle to PDF. Results are in input order; one failing
/// paper does not stop the others.
#[cfg(feature = "rayon-executor")]
pub fn render_many(
    director: &PaginationDirector,
    bundles: &[PaperBundle],
) -> Vec<Result<RenderedPaper<Vec<u8>>, EngineError>> {
    log::debug!(
        "Rendering {} paper(s) on {} thread(s)",
        bundles.len(),
        rayon::current_num_threads()
    );
    bundles
        .par_iter()
        .map(|bundle| director.render_pdf(bundle))
        .collect()
}

#[cfg(not(feature = "rayon-executor"))]
pub fn render_many(
    director: &PaginationDirector,
    bundles: &[PaperBundle],
) -> Vec<Result<RenderedPaper<Vec<u8>>, EngineError>> {
    bundles
        .iter()
        .map(|bundle| director.render_pdf(bundle))
        .collect()
}
