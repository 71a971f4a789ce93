//! Export of canvas snapshots as PNG files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, TimeZone};
use image::ImageFormat;
use painting::CpuSurface;

/// `yyyy-MM-dd-HH-mm-ss.png`
pub fn snapshot_file_name<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}.png", time.format("%Y-%m-%d-%H-%M-%S"))
}

/// Write `snapshot` into `dir`, creating the directory if needed
pub fn save_snapshot<Tz: TimeZone>(
    snapshot: &CpuSurface,
    dir: &Path,
    time: &DateTime<Tz>,
) -> anyhow::Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(snapshot_file_name(time));
    snapshot
        .to_image()
        .save_with_format(&path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_file_name_format() {
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(snapshot_file_name(&time), "2024-03-09-07-05-01.png");
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = std::env::temp_dir()
            .join(format!("jpainter-save-{}", std::process::id()))
            .join("nested");
        let _ = fs::remove_dir_all(&dir);

        let mut surface = CpuSurface::new(3, 2);
        surface.clear([1.0, 0.0, 0.0, 1.0]);
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let path = save_snapshot(&surface, &dir, &time).unwrap();
        assert_eq!(path, dir.join("2024-01-02-03-04-05.png"));

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0, 255]);

        let _ = fs::remove_dir_all(dir.parent().unwrap_or(dir.as_path()));
    }
}
