//! CSV readers for grid, hierarchy and measurement files.

use std::str::FromStr;

use cm_model::Feature;
use csv::StringRecord;
use tracing::warn;

use crate::error::{IngestError, Result};

/// The single row of a `grid.csv` file.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub extent: [f64; 6],
    pub resolution: [u32; 3],
}

/// One row of `stacks.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct StackRow {
    pub name: String,
    pub feature: Feature,
    pub order: i64,
}

/// One row of `surfaces.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRow {
    pub name: String,
    pub stack: String,
    pub order: i64,
}

/// One row of `points.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRow {
    pub surface: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One row of `orientations.csv`, gradient columns already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationRow {
    pub surface: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pole_vector: [f64; 3],
}

/// Rows read up to the first invalid one.
///
/// When `error` is set the file was rejected partway through; `rows`
/// still holds everything before the failure so the caller can apply
/// the valid prefix and surface the error afterwards.
#[derive(Debug)]
pub struct RowSet<T> {
    pub rows: Vec<T>,
    pub error: Option<IngestError>,
}

impl<T> RowSet<T> {
    fn complete(rows: Vec<T>) -> Self {
        Self { rows, error: None }
    }

    fn failed(error: IngestError) -> Self {
        Self {
            rows: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Convert a dip/azimuth/polarity measurement into the pole vector of
/// the interface. Angles are in degrees; the epsilon keeps downstream
/// solvers away from exactly-zero gradient components.
pub fn pole_from_dip_azimuth(dip: f64, azimuth: f64, polarity: f64) -> [f64; 3] {
    const EPS: f64 = 1e-12;
    let dip = dip.to_radians();
    let azimuth = azimuth.to_radians();
    [
        dip.sin() * azimuth.sin() * polarity + EPS,
        dip.sin() * azimuth.cos() * polarity + EPS,
        dip.cos() * polarity + EPS,
    ]
}

fn column(headers: &StringRecord, name: &'static str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or(IngestError::MissingColumn { column: name })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header.trim() == name)
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map_or(0, |position| position.line())
}

fn parse_field<T: FromStr>(
    record: &StringRecord,
    index: usize,
    name: &'static str,
) -> Result<T> {
    let value = record.get(index).unwrap_or_default();
    value.trim().parse().map_err(|_| IngestError::InvalidValue {
        column: name,
        value: value.to_owned(),
        line: record_line(record),
    })
}

/// Read `grid.csv`: one data row with the extent and resolution columns.
pub fn read_grid_csv(content: &[u8]) -> Result<GridRow> {
    let mut reader = csv::Reader::from_reader(content);
    let headers = reader.headers()?.clone();
    let extent_columns = ["xmin", "xmax", "ymin", "ymax", "zmin", "zmax"];
    let resolution_columns = ["nx", "ny", "nz"];

    let record = reader.records().next().ok_or(IngestError::Empty)??;
    let mut extent = [0.0; 6];
    for (slot, name) in extent.iter_mut().zip(extent_columns) {
        *slot = parse_field(&record, column(&headers, name)?, name)?;
    }
    let mut resolution = [0u32; 3];
    for (slot, name) in resolution.iter_mut().zip(resolution_columns) {
        *slot = parse_field(&record, column(&headers, name)?, name)?;
    }
    Ok(GridRow { extent, resolution })
}

/// Read `stacks.csv`. The valid prefix is sorted by its `order` column
/// so stacks are created bottom-up regardless of file order.
pub fn read_stacks_csv(content: &[u8]) -> RowSet<StackRow> {
    let mut reader = csv::Reader::from_reader(content);
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(error) => return RowSet::failed(error.into()),
    };
    let columns = match (
        column(&headers, "stack"),
        column(&headers, "feature"),
        column(&headers, "order"),
    ) {
        (Ok(stack), Ok(feature), Ok(order)) => (stack, feature, order),
        (Err(error), ..) | (_, Err(error), _) | (.., Err(error)) => {
            return RowSet::failed(error);
        }
    };

    let mut rows: Vec<StackRow> = Vec::new();
    let mut failure = None;
    for result in reader.records() {
        let parsed = result.map_err(IngestError::from).and_then(|record| {
            Ok(StackRow {
                name: parse_field(&record, columns.0, "stack")?,
                feature: parse_field(&record, columns.1, "feature")?,
                order: parse_field(&record, columns.2, "order")?,
            })
        });
        match parsed {
            Ok(row) => rows.push(row),
            Err(error) => {
                warn!(%error, "aborting stacks.csv after {} rows", rows.len());
                failure = Some(error);
                break;
            }
        }
    }
    rows.sort_by_key(|row| row.order);
    RowSet {
        rows,
        error: failure,
    }
}

/// Read `surfaces.csv`, sorted like [`read_stacks_csv`].
pub fn read_surfaces_csv(content: &[u8]) -> RowSet<SurfaceRow> {
    let mut reader = csv::Reader::from_reader(content);
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(error) => return RowSet::failed(error.into()),
    };
    let columns = match (
        column(&headers, "formation"),
        column(&headers, "stack"),
        column(&headers, "order"),
    ) {
        (Ok(name), Ok(stack), Ok(order)) => (name, stack, order),
        (Err(error), ..) | (_, Err(error), _) | (.., Err(error)) => {
            return RowSet::failed(error);
        }
    };

    let mut rows: Vec<SurfaceRow> = Vec::new();
    let mut failure = None;
    for result in reader.records() {
        let parsed = result.map_err(IngestError::from).and_then(|record| {
            Ok(SurfaceRow {
                name: parse_field(&record, columns.0, "formation")?,
                stack: parse_field(&record, columns.1, "stack")?,
                order: parse_field(&record, columns.2, "order")?,
            })
        });
        match parsed {
            Ok(row) => rows.push(row),
            Err(error) => {
                warn!(%error, "aborting surfaces.csv after {} rows", rows.len());
                failure = Some(error);
                break;
            }
        }
    }
    rows.sort_by_key(|row| row.order);
    RowSet {
        rows,
        error: failure,
    }
}

/// Read `points.csv` in file order.
pub fn read_points_csv(content: &[u8]) -> RowSet<PointRow> {
    let mut reader = csv::Reader::from_reader(content);
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(error) => return RowSet::failed(error.into()),
    };
    let columns = match (
        column(&headers, "X"),
        column(&headers, "Y"),
        column(&headers, "Z"),
        column(&headers, "formation"),
    ) {
        (Ok(x), Ok(y), Ok(z), Ok(surface)) => (x, y, z, surface),
        (Err(error), ..) | (_, Err(error), ..) | (_, _, Err(error), _) | (.., Err(error)) => {
            return RowSet::failed(error);
        }
    };

    let mut rows: Vec<PointRow> = Vec::new();
    let mut failure = None;
    for result in reader.records() {
        let parsed = result.map_err(IngestError::from).and_then(|record| {
            Ok(PointRow {
                x: parse_field(&record, columns.0, "X")?,
                y: parse_field(&record, columns.1, "Y")?,
                z: parse_field(&record, columns.2, "Z")?,
                surface: parse_field(&record, columns.3, "formation")?,
            })
        });
        match parsed {
            Ok(row) => rows.push(row),
            Err(error) => {
                warn!(%error, "aborting points.csv after {} rows", rows.len());
                failure = Some(error);
                break;
            }
        }
    }
    RowSet {
        rows,
        error: failure,
    }
}

enum GradientSchema {
    /// `G_x`/`G_y`/`G_z` columns carry the pole vector directly.
    Direct(usize, usize, usize),
    /// `dip`/`azimuth`/`polarity` columns, converted on read.
    DipAzimuth(usize, usize, usize),
}

/// Read `orientations.csv`. Two schemas are accepted: explicit gradient
/// columns, or dip/azimuth/polarity angles which are converted with
/// [`pole_from_dip_azimuth`]. Explicit gradients win when both exist.
pub fn read_orientations_csv(content: &[u8]) -> RowSet<OrientationRow> {
    let mut reader = csv::Reader::from_reader(content);
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(error) => return RowSet::failed(error.into()),
    };
    let columns = match (
        column(&headers, "X"),
        column(&headers, "Y"),
        column(&headers, "Z"),
        column(&headers, "formation"),
    ) {
        (Ok(x), Ok(y), Ok(z), Ok(surface)) => (x, y, z, surface),
        (Err(error), ..) | (_, Err(error), ..) | (_, _, Err(error), _) | (.., Err(error)) => {
            return RowSet::failed(error);
        }
    };
    let schema = match (
        find_column(&headers, "G_x"),
        find_column(&headers, "G_y"),
        find_column(&headers, "G_z"),
        find_column(&headers, "dip"),
        find_column(&headers, "azimuth"),
        find_column(&headers, "polarity"),
    ) {
        (Some(gx), Some(gy), Some(gz), ..) => GradientSchema::Direct(gx, gy, gz),
        (_, _, _, Some(dip), Some(azimuth), Some(polarity)) => {
            GradientSchema::DipAzimuth(dip, azimuth, polarity)
        }
        _ => return RowSet::failed(IngestError::MissingColumn { column: "G_x" }),
    };

    let mut rows: Vec<OrientationRow> = Vec::new();
    let mut failure = None;
    for result in reader.records() {
        let parsed = result.map_err(IngestError::from).and_then(|record| {
            let pole_vector = match schema {
                GradientSchema::Direct(gx, gy, gz) => [
                    parse_field(&record, gx, "G_x")?,
                    parse_field(&record, gy, "G_y")?,
                    parse_field(&record, gz, "G_z")?,
                ],
                GradientSchema::DipAzimuth(dip, azimuth, polarity) => pole_from_dip_azimuth(
                    parse_field(&record, dip, "dip")?,
                    parse_field(&record, azimuth, "azimuth")?,
                    parse_field(&record, polarity, "polarity")?,
                ),
            };
            Ok(OrientationRow {
                x: parse_field(&record, columns.0, "X")?,
                y: parse_field(&record, columns.1, "Y")?,
                z: parse_field(&record, columns.2, "Z")?,
                surface: parse_field(&record, columns.3, "formation")?,
                pole_vector,
            })
        });
        match parsed {
            Ok(row) => rows.push(row),
            Err(error) => {
                warn!(%error, "aborting orientations.csv after {} rows", rows.len());
                failure = Some(error);
                break;
            }
        }
    }
    RowSet {
        rows,
        error: failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_csv_single_row() {
        let csv = b"xmin,xmax,ymin,ymax,zmin,zmax,nx,ny,nz\n0,100,0,200,0,300,10,20,30\n";
        let grid = read_grid_csv(csv).unwrap();
        assert_eq!(grid.extent, [0.0, 100.0, 0.0, 200.0, 0.0, 300.0]);
        assert_eq!(grid.resolution, [10, 20, 30]);
    }

    #[test]
    fn test_grid_csv_missing_column() {
        let csv = b"xmin,xmax,ymin,ymax,zmin,zmax,nx,ny\n0,1,0,1,0,1,2,2\n";
        let err = read_grid_csv(csv).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { column: "nz" }));
    }

    #[test]
    fn test_grid_csv_empty() {
        let err = read_grid_csv(b"xmin,xmax,ymin,ymax,zmin,zmax,nx,ny,nz\n").unwrap_err();
        assert!(matches!(err, IngestError::Empty));
    }

    #[test]
    fn test_stacks_sorted_by_order() {
        let csv = b"stack,feature,order\nUpper,Erosion,2\nLower,Onlap,1\n";
        let set = read_stacks_csv(csv);
        assert!(set.is_complete());
        let names: Vec<&str> = set.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["Lower", "Upper"]);
        assert_eq!(set.rows[0].feature, Feature::Onlap);
    }

    #[test]
    fn test_stacks_bad_feature_keeps_prefix() {
        let csv = b"stack,feature,order\nA,Erosion,1\nB,Volcano,2\nC,Onlap,3\n";
        let set = read_stacks_csv(csv);
        assert_eq!(set.rows.len(), 1);
        assert_eq!(set.rows[0].name, "A");
        assert!(matches!(
            set.error,
            Some(IngestError::InvalidValue { column: "feature", .. })
        ));
    }

    #[test]
    fn test_points_abort_mid_file() {
        let csv = b"X,Y,Z,formation\n1,2,3,A\n4,5,6,A\n7,eight,9,A\n10,11,12,A\n";
        let set = read_points_csv(csv);
        assert_eq!(set.rows.len(), 2);
        assert!(matches!(
            set.error,
            Some(IngestError::InvalidValue { column: "Y", line: 4, .. })
        ));
    }

    #[test]
    fn test_orientations_direct_gradients() {
        let csv = b"X,Y,Z,G_x,G_y,G_z,formation\n1,2,3,0.1,0.2,0.9,A\n";
        let set = read_orientations_csv(csv);
        assert!(set.is_complete());
        assert_eq!(set.rows[0].pole_vector, [0.1, 0.2, 0.9]);
    }

    #[test]
    fn test_orientations_dip_azimuth_conversion() {
        let csv = b"X,Y,Z,dip,azimuth,polarity,formation\n1,2,3,90,0,1,A\n";
        let set = read_orientations_csv(csv);
        assert!(set.is_complete());
        let [gx, gy, gz] = set.rows[0].pole_vector;
        assert!(gx.abs() < 1e-9);
        assert!((gy - 1.0).abs() < 1e-9);
        assert!(gz.abs() < 1e-9);
    }

    #[test]
    fn test_pole_conversion_flat_layer() {
        // Horizontal layer: pole points straight up.
        let [gx, gy, gz] = pole_from_dip_azimuth(0.0, 0.0, 1.0);
        assert!(gx.abs() < 1e-9 && gy.abs() < 1e-9);
        assert!((gz - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orientations_without_gradient_columns() {
        let csv = b"X,Y,Z,formation\n1,2,3,A\n";
        let set = read_orientations_csv(csv);
        assert!(set.rows.is_empty());
        assert!(matches!(
            set.error,
            Some(IngestError::MissingColumn { column: "G_x" })
        ));
    }
}
