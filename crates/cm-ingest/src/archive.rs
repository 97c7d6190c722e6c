//! Zip archive readers.
//!
//! Both archive formats tolerate exactly one optional top-level
//! directory: everything is looked up under that prefix, and an
//! archive with several directory entries is rejected.

use std::io::{Cursor, Read};

use cm_model::{TopographyCategory, TopographySettings};
use tracing::warn;
use zip::ZipArchive;

use crate::error::{IngestError, Result};
use crate::tabular::{
    GridRow, OrientationRow, PointRow, RowSet, StackRow, SurfaceRow, read_grid_csv,
    read_orientations_csv, read_points_csv, read_stacks_csv, read_surfaces_csv,
};

/// Outcome of reading a `topography.zip`.
#[derive(Debug, Clone, PartialEq)]
pub enum TopographyImport {
    /// Random-terrain parameters from `topography.csv`.
    Settings(TopographySettings),
    /// A raster or saved elevation file referenced by `topography.csv`.
    File {
        category: TopographyCategory,
        bytes: Vec<u8>,
    },
}

/// Contents of a full input bundle, one slot per recognized file name.
#[derive(Debug, Default)]
pub struct BundleFiles {
    pub grid: Option<GridRow>,
    pub stacks: Option<RowSet<StackRow>>,
    pub surfaces: Option<RowSet<SurfaceRow>>,
    pub points: Option<RowSet<PointRow>>,
    pub orientations: Option<RowSet<OrientationRow>>,
    pub topography: Option<TopographyImport>,
}

fn archive_root(names: &[String]) -> Result<String> {
    // Only single-component directory names count as candidate roots;
    // nested subdirectories belong to whichever root holds them.
    let mut directories = names
        .iter()
        .filter(|name| name.ends_with('/') && !name.trim_end_matches('/').contains('/'));
    let root = directories.next();
    if directories.next().is_some() {
        return Err(IngestError::AmbiguousArchiveRoot);
    }
    Ok(root.cloned().unwrap_or_default())
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Vec<u8>> {
    let mut entry = archive.by_name(name)?;
    let mut buffer = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "yes" | "1")
}

/// Read a `topography.zip`: a `topography.csv` describing either random
/// terrain parameters or a referenced elevation file in the archive.
pub fn read_topography_zip(content: &[u8]) -> Result<TopographyImport> {
    let mut archive = ZipArchive::new(Cursor::new(content))?;
    let names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    let root = archive_root(&names)?;

    let manifest = format!("{root}topography.csv");
    if !names.contains(&manifest) {
        return Err(IngestError::MissingEntry { name: manifest });
    }
    let manifest_bytes = read_entry(&mut archive, &manifest)?;

    let mut reader = csv::Reader::from_reader(manifest_bytes.as_slice());
    let headers = reader.headers()?.clone();
    let field = |headers: &csv::StringRecord, name: &'static str| -> Result<usize> {
        headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or(IngestError::MissingColumn { column: name })
    };
    let category_column = field(&headers, "category")?;
    let record = reader.records().next().ok_or(IngestError::Empty)??;

    let raw_category = record.get(category_column).unwrap_or_default().trim();
    let category: TopographyCategory =
        raw_category
            .parse()
            .map_err(|_| IngestError::InvalidValue {
                column: "category",
                value: raw_category.to_owned(),
                line: record.position().map_or(0, |p| p.line()),
            })?;

    match category {
        TopographyCategory::Random => {
            let number = |name: &'static str| -> Result<&str> {
                let index = field(&headers, name)?;
                Ok(record.get(index).unwrap_or_default())
            };
            let parse = |name: &'static str, value: &str| IngestError::InvalidValue {
                column: name,
                value: value.to_owned(),
                line: record.position().map_or(0, |p| p.line()),
            };
            let seed = number("seed")?;
            let fd = number("fd")?;
            let dzmin = number("dzmin")?;
            let dzmax = number("dzmax")?;
            let rx = number("rx")?;
            let ry = number("ry")?;
            let on = number("on")?;
            Ok(TopographyImport::Settings(TopographySettings {
                on: parse_bool(on),
                category,
                seed: seed.trim().parse().map_err(|_| parse("seed", seed))?,
                fd: fd.trim().parse().map_err(|_| parse("fd", fd))?,
                dzmin: dzmin.trim().parse().map_err(|_| parse("dzmin", dzmin))?,
                dzmax: dzmax.trim().parse().map_err(|_| parse("dzmax", dzmax))?,
                rx: rx.trim().parse().map_err(|_| parse("rx", rx))?,
                ry: ry.trim().parse().map_err(|_| parse("ry", ry))?,
            }))
        }
        TopographyCategory::Gdal | TopographyCategory::Saved => {
            let filename_column = field(&headers, "filename")?;
            let filename = record.get(filename_column).unwrap_or_default().trim();
            let entry = format!("{root}{filename}");
            if !names.contains(&entry) {
                return Err(IngestError::MissingEntry { name: entry });
            }
            Ok(TopographyImport::File {
                category,
                bytes: read_entry(&mut archive, &entry)?,
            })
        }
    }
}

/// Read a full input bundle. Recognized file names are read into their
/// slots; a malformed grid or topography entry is logged and skipped
/// rather than failing the bundle, row files carry their own error.
pub fn read_bundle_zip(content: &[u8]) -> Result<BundleFiles> {
    let mut archive = ZipArchive::new(Cursor::new(content))?;
    let names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    let root = archive_root(&names)?;
    let mut bundle = BundleFiles::default();

    let entry = |name: &str| format!("{root}{name}");

    if names.contains(&entry("grid.csv")) {
        let bytes = read_entry(&mut archive, &entry("grid.csv"))?;
        match read_grid_csv(&bytes) {
            Ok(grid) => bundle.grid = Some(grid),
            Err(error) => warn!(%error, "skipping malformed grid.csv in bundle"),
        }
    }
    if names.contains(&entry("stacks.csv")) {
        let bytes = read_entry(&mut archive, &entry("stacks.csv"))?;
        bundle.stacks = Some(read_stacks_csv(&bytes));
    }
    if names.contains(&entry("surfaces.csv")) {
        let bytes = read_entry(&mut archive, &entry("surfaces.csv"))?;
        bundle.surfaces = Some(read_surfaces_csv(&bytes));
    }
    if names.contains(&entry("points.csv")) {
        let bytes = read_entry(&mut archive, &entry("points.csv"))?;
        bundle.points = Some(read_points_csv(&bytes));
    }
    if names.contains(&entry("orientations.csv")) {
        let bytes = read_entry(&mut archive, &entry("orientations.csv"))?;
        bundle.orientations = Some(read_orientations_csv(&bytes));
    }
    if names.contains(&entry("topography.zip")) {
        let bytes = read_entry(&mut archive, &entry("topography.zip"))?;
        match read_topography_zip(&bytes) {
            Ok(topography) => bundle.topography = Some(topography),
            Err(error) => warn!(%error, "skipping malformed topography.zip in bundle"),
        }
    }
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, bytes) in entries {
            if name.ends_with('/') {
                writer.add_directory(name.trim_end_matches('/'), options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(bytes).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    const RANDOM_MANIFEST: &[u8] =
        b"category,seed,fd,dzmin,dzmax,rx,ry,on\nrandom,42,2.5,10,20,4,5,true\n";

    #[test]
    fn test_topography_random_settings() {
        let archive = build_zip(&[("topography.csv", RANDOM_MANIFEST)]);
        let imported = read_topography_zip(&archive).unwrap();
        match imported {
            TopographyImport::Settings(settings) => {
                assert!(settings.on);
                assert_eq!(settings.seed, 42);
                assert_eq!(settings.rx, 4);
                assert_eq!(settings.category, TopographyCategory::Random);
            }
            other => panic!("unexpected import: {other:?}"),
        }
    }

    #[test]
    fn test_topography_under_single_directory() {
        let archive = build_zip(&[
            ("terrain/", b""),
            ("terrain/topography.csv", RANDOM_MANIFEST),
        ]);
        assert!(read_topography_zip(&archive).is_ok());
    }

    #[test]
    fn test_nested_subdirectories_keep_a_single_root() {
        let archive = build_zip(&[
            ("data/", b"".as_slice()),
            ("data/raw/", b"".as_slice()),
            ("data/topography.csv", RANDOM_MANIFEST),
        ]);
        assert!(read_topography_zip(&archive).is_ok());
    }

    #[test]
    fn test_topography_saved_file() {
        let manifest = b"category,filename\nsaved,elevation.npy\n";
        let archive = build_zip(&[
            ("topography.csv", manifest.as_slice()),
            ("elevation.npy", b"\x93NUMPY".as_slice()),
        ]);
        match read_topography_zip(&archive).unwrap() {
            TopographyImport::File { category, bytes } => {
                assert_eq!(category, TopographyCategory::Saved);
                assert_eq!(&bytes[..2], b"\x93N");
            }
            other => panic!("unexpected import: {other:?}"),
        }
    }

    #[test]
    fn test_topography_missing_manifest() {
        let archive = build_zip(&[("readme.txt", b"hi".as_slice())]);
        assert!(matches!(
            read_topography_zip(&archive),
            Err(IngestError::MissingEntry { .. })
        ));
    }

    #[test]
    fn test_multiple_directories_rejected() {
        let archive = build_zip(&[
            ("a/", b"".as_slice()),
            ("b/", b"".as_slice()),
            ("a/topography.csv", RANDOM_MANIFEST),
        ]);
        assert!(matches!(
            read_topography_zip(&archive),
            Err(IngestError::AmbiguousArchiveRoot)
        ));
    }

    #[test]
    fn test_bundle_reads_all_slots() {
        let archive = build_zip(&[
            (
                "grid.csv",
                b"xmin,xmax,ymin,ymax,zmin,zmax,nx,ny,nz\n0,1,0,1,0,1,2,2,2\n".as_slice(),
            ),
            ("stacks.csv", b"stack,feature,order\nS1,Erosion,1\n".as_slice()),
            (
                "surfaces.csv",
                b"formation,stack,order\nA,S1,1\n".as_slice(),
            ),
            ("points.csv", b"X,Y,Z,formation\n1,2,3,A\n".as_slice()),
        ]);
        let bundle = read_bundle_zip(&archive).unwrap();
        assert!(bundle.grid.is_some());
        assert_eq!(bundle.stacks.unwrap().rows.len(), 1);
        assert_eq!(bundle.surfaces.unwrap().rows.len(), 1);
        assert_eq!(bundle.points.unwrap().rows.len(), 1);
        assert!(bundle.orientations.is_none());
        assert!(bundle.topography.is_none());
    }

    #[test]
    fn test_bundle_tolerates_bad_grid() {
        let archive = build_zip(&[
            ("grid.csv", b"xmin\n0\n".as_slice()),
            ("stacks.csv", b"stack,feature,order\nS1,Erosion,1\n".as_slice()),
        ]);
        let bundle = read_bundle_zip(&archive).unwrap();
        assert!(bundle.grid.is_none());
        assert!(bundle.stacks.is_some());
    }
}
