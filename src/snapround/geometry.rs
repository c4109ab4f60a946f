use geo::{LineString, MultiLineString};

use crate::config::SnapRoundingConfig;
use crate::error::Result;
use crate::noding::{Noder, SegmentChain, ValidatingNoder};

use super::SnapRoundingNoder;

/// Snap-round a set of lines onto the grid described by `config`.
///
/// Each input line becomes one chain; the output holds the noded pieces of
/// every line that survives rounding, in input order.
pub fn snap_round(lines: &MultiLineString<f64>, config: &SnapRoundingConfig) -> Result<MultiLineString<f64>> {
    let chains = lines.0.iter().enumerate()
        .map(|(i, line)| SegmentChain::new(line.0.clone(), i))
        .collect::<Vec<_>>();

    let mut noder = SnapRoundingNoder::from_config(config)?;
    let noded = if config.validate {
        ValidatingNoder::new(noder).compute_nodes(chains)?
    } else {
        noder.compute_nodes(chains)?
    };

    Ok(MultiLineString::new(noded.into_iter().map(|c| LineString::new(c.coordinates().to_vec())).collect()))
}
