use std::path::Path;

use log::info;

use super::file_io::file_size;
use crate::error::Result;

/// Percentage saved going from `before` to `after` bytes. Negative when the data grew.
pub fn saving(before: usize, after: usize) -> f64 {
    if before == 0 {
        return 0.0;
    }
    100.0 - (100.0 * after as f64 / before as f64)
}

/// Reports how a stage grew or shrank the data.
pub fn stage_statistics(operation: &str, before: usize, after: usize) {
    let percentage = saving(before, after);
    info!(
        "- {} - in {} bytes, out {} bytes - {} {:4.1}%",
        operation,
        before,
        after,
        if before >= after { "saving" } else { "bigger by" },
        percentage.abs()
    );
}

/// Summary line comparing the sizes of the input and output files.
pub fn final_statistics(input: &Path, output: &Path) -> Result<String> {
    let in_size = file_size(input)? as usize;
    let out_size = file_size(output)? as usize;
    Ok(format!(
        "Before {} bytes, after {} bytes = {:4.1}% change",
        in_size,
        out_size,
        saving(in_size, out_size)
    ))
}
