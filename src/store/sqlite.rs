//! Reads the `station` and `measurement` tables of a SQLite climate database.
//!
//! The connection is opened read-only and lives only for the duration of
//! [`read_tables`]; it is dropped on every return path, including errors.

use crate::store::error::DataStoreError;
use crate::store::schema::{
    conform_frame, Table, COL_DATE, COL_ELEVATION, COL_LATITUDE, COL_LONGITUDE, COL_NAME,
    COL_PRCP, COL_STATION, COL_TOBS,
};
use log::info;
use polars::prelude::{Column, DataFrame};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Loads both tables, conformed to the static schema.
pub(crate) fn read_tables(path: &Path) -> Result<(DataFrame, DataFrame), DataStoreError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(sqlite_error(path))?;

    check_columns(&conn, path, Table::Station)?;
    check_columns(&conn, path, Table::Measurement)?;

    let stations = DataFrame::new(read_stations(&conn).map_err(sqlite_error(path))?).map_err(
        |e| DataStoreError::Frame {
            table: Table::Station,
            source: e,
        },
    )?;
    let measurements = DataFrame::new(read_measurements(&conn).map_err(sqlite_error(path))?)
        .map_err(|e| DataStoreError::Frame {
            table: Table::Measurement,
            source: e,
        })?;

    info!(
        "Read {} stations and {} measurements from {:?}",
        stations.height(),
        measurements.height(),
        path
    );

    Ok((
        conform_frame(Table::Station, stations)?,
        conform_frame(Table::Measurement, measurements)?,
    ))
}

fn sqlite_error(path: &Path) -> impl Fn(rusqlite::Error) -> DataStoreError + '_ {
    move |source| DataStoreError::Sqlite {
        path: path.to_path_buf(),
        source,
    }
}

/// Fails with `MissingColumn` if the table lacks any schema column. A missing table
/// reports as its first column missing.
fn check_columns(conn: &Connection, path: &Path, table: Table) -> Result<(), DataStoreError> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table.table_name()))
        .map_err(sqlite_error(path))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(sqlite_error(path))?
        .collect::<Result<Vec<String>, _>>()
        .map_err(sqlite_error(path))?;

    for column in table.get_schema_column_names() {
        if !present.iter().any(|name| name.eq_ignore_ascii_case(column)) {
            return Err(DataStoreError::MissingColumn { table, column });
        }
    }
    Ok(())
}

fn read_stations(conn: &Connection) -> rusqlite::Result<Vec<Column>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COL_STATION}, {COL_NAME}, {COL_LATITUDE}, {COL_LONGITUDE}, {COL_ELEVATION} FROM station"
    ))?;

    let mut ids: Vec<Option<String>> = Vec::new();
    let mut names: Vec<Option<String>> = Vec::new();
    let mut latitudes: Vec<Option<f64>> = Vec::new();
    let mut longitudes: Vec<Option<f64>> = Vec::new();
    let mut elevations: Vec<Option<f64>> = Vec::new();

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
        names.push(row.get(1)?);
        latitudes.push(row.get(2)?);
        longitudes.push(row.get(3)?);
        elevations.push(row.get(4)?);
    }

    Ok(vec![
        Column::new(COL_STATION.into(), ids),
        Column::new(COL_NAME.into(), names),
        Column::new(COL_LATITUDE.into(), latitudes),
        Column::new(COL_LONGITUDE.into(), longitudes),
        Column::new(COL_ELEVATION.into(), elevations),
    ])
}

/// Dates stay as text here; `conform_frame` parses them.
fn read_measurements(conn: &Connection) -> rusqlite::Result<Vec<Column>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COL_STATION}, {COL_DATE}, {COL_PRCP}, {COL_TOBS} FROM measurement"
    ))?;

    let mut stations: Vec<Option<String>> = Vec::new();
    let mut dates: Vec<Option<String>> = Vec::new();
    let mut prcp: Vec<Option<f64>> = Vec::new();
    let mut tobs: Vec<Option<f64>> = Vec::new();

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        stations.push(row.get(0)?);
        dates.push(row.get(1)?);
        prcp.push(row.get(2)?);
        tobs.push(row.get(3)?);
    }

    Ok(vec![
        Column::new(COL_STATION.into(), stations),
        Column::new(COL_DATE.into(), dates),
        Column::new(COL_PRCP.into(), prcp),
        Column::new(COL_TOBS.into(), tobs),
    ])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::TempDir;

    /// Writes a database with the same layout as `hawaii.sqlite`, including the
    /// surrogate `id` columns the loader ignores.
    pub(crate) fn write_fixture_database(dir: &TempDir) -> rusqlite::Result<std::path::PathBuf> {
        let path = dir.path().join("hawaii.sqlite");
        let conn = Connection::open(&path)?;
        conn.execute_batch(
            "CREATE TABLE station (
                id INTEGER PRIMARY KEY,
                station TEXT,
                name TEXT,
                latitude FLOAT,
                longitude FLOAT,
                elevation FLOAT
            );
            CREATE TABLE measurement (
                id INTEGER PRIMARY KEY,
                station TEXT,
                date TEXT,
                prcp FLOAT,
                tobs FLOAT
            );",
        )?;
        for (id, name, lat, lon, elev) in [
            ("S1", "Station One", 21.2716, -157.8168, Some(3.0)),
            ("S2", "Station Two", 21.4234, -157.8015, None),
        ] {
            conn.execute(
                "INSERT INTO station (station, name, latitude, longitude, elevation) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, name, lat, lon, elev],
            )?;
        }
        for (station, date, prcp, tobs) in [
            ("S1", "2016-08-23", Some(0.2), Some(68.0)),
            ("S1", "2017-08-20", Some(1.0), Some(70.0)),
            ("S1", "2017-08-23", Some(0.5), Some(75.0)),
            ("S2", "2017-08-23", None, Some(80.0)),
        ] {
            conn.execute(
                "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
                params![station, date, prcp, tobs],
            )?;
        }
        Ok(path)
    }

    #[test]
    fn test_read_tables_from_fixture() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_fixture_database(&dir)?;

        let (stations, measurements) = read_tables(&path)?;

        assert_eq!(stations.shape(), (2, 5));
        assert_eq!(measurements.shape(), (4, 4));
        assert_eq!(measurements.column("prcp")?.null_count(), 1);
        assert_eq!(stations.column("elevation")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_table_fails_fast() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("empty.sqlite");
        let conn = Connection::open(&path)?;
        conn.execute_batch("CREATE TABLE station (station TEXT, name TEXT);")?;
        drop(conn);

        let err = read_tables(&path).unwrap_err();
        assert!(
            matches!(
                err,
                DataStoreError::MissingColumn {
                    table: Table::Station,
                    column: "latitude"
                }
            ),
            "unexpected error: {err:?}"
        );
        Ok(())
    }
}
