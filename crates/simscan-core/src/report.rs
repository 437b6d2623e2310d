use std::io::Write;

use crate::error::Error;
use crate::similarity::CandidatePair;

/// Stable sort by source path, byte order. Tie order among equal sources is
/// left as produced by the comparison.
pub fn sort_by_source(pairs: &mut [CandidatePair]) {
    pairs.sort_by(|a, b| a.source.cmp(&b.source));
}

/// Write the candidate pairs as CSV: a `Source,Dest,Distance` header, then
/// one row per pair with the distance in decimal form.
pub fn write_report<W: Write>(writer: W, pairs: &[CandidatePair]) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Source", "Dest", "Distance"])?;
    for pair in pairs {
        let distance = pair.distance.to_string();
        csv_writer.write_record([pair.source.as_str(), pair.dest.as_str(), distance.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}
