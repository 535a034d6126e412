//! CSV rendering of prediction results

use std::io::Write;

use crate::logic::scoring::PredictionResult;

pub const CSV_HEADER: &str =
    "player_name,position,risk_probability,risk_prediction,risk_level,prediction_date";

/// Quote a field only when it needs it
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_csv<W: Write>(out: &mut W, results: &[PredictionResult]) -> std::io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;

    for r in results {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            escape(&r.player_name),
            escape(&r.position),
            r.risk_probability,
            r.risk_prediction,
            r.risk_level.as_str(),
            r.prediction_date.format("%Y-%m-%d")
        )?;
    }

    Ok(())
}

pub fn to_csv_bytes(results: &[PredictionResult]) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(64 * (results.len() + 1));
    write_csv(&mut buf, results)?;
    Ok(buf)
}
