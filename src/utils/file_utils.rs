use crate::error::AuditError;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `report` as 2-space indented JSON, creating parent directories.
///
/// The file is written to a sibling temp path and renamed into place, so an
/// aborted run never leaves a half-written report behind.
pub fn save_report<P, T>(output_path: P, report: &T) -> Result<(), AuditError>
where
    P: AsRef<Path>,
    T: Serialize + ?Sized,
{
    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = output_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let mut writer = BufWriter::new(File::create(temp_path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    drop(writer);

    fs::rename(temp_path, output_path)?;
    Ok(())
}
