//! Read-only reporting client over the EnergyPlus results database
//!
//! Wraps `eplusout.sql` with a handful of queries against the tabular-data
//! tables a simulation writes (`Simulations`, `TabularDataWithStrings`).
//! Values in `TabularDataWithStrings` are stored as text, so numeric reads
//! cast in SQL.

use std::path::Path;

use regex::Regex;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use thiserror::Error;

/// Results database file name within a run's output directory.
pub const SQL_FILE_NAME: &str = "eplusout.sql";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not open results database: {0}")]
    Open(#[source] rusqlite::Error),
    #[error("results database is not an EnergyPlus output file")]
    Incompatible,
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// One row of the unmet-hours summary, per zone.
#[derive(Clone, Debug, PartialEq)]
pub struct UnmetHoursRow {
    pub zone_name: String,
    pub during_heating: f64,
    pub during_cooling: f64,
    pub during_occ_heating: f64,
    pub during_occ_cooling: f64,
}

/// Column headers of the unmet-hours table, in query order.
pub const UNMET_HOURS_COLUMNS: [&str; 4] = [
    "During Heating",
    "During Cooling",
    "During Occupied Heating",
    "During Occupied Cooling",
];

/// End uses by fuel: row and column names plus a dense value matrix.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EndUseTable {
    pub end_use_names: Vec<String>,
    pub fuel_names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Read-only connection to a completed run's results database.
pub struct SqliteReports {
    conn: Connection,
}

impl SqliteReports {
    /// Open the database read-only and verify it looks like an EnergyPlus
    /// output file (the `Simulations` table must yield a version).
    pub fn open(path: &Path) -> Result<Self, ReportError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(ReportError::Open)?;

        let reports = Self { conn };
        if reports.energyplus_version()?.is_empty() {
            return Err(ReportError::Incompatible);
        }
        Ok(reports)
    }

    /// The engine version that wrote this database, e.g. `"22.2.0"`.
    ///
    /// The stored string varies across releases ("EnergyPlus, Version
    /// 8.2.0-8397c2e30b, YMD=…" and friends); the dotted version number is
    /// extracted from whatever surrounds it.
    pub fn energyplus_version(&self) -> Result<String, ReportError> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT EnergyPlusVersion FROM Simulations", [], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(raw) = raw else {
            return Ok(String::new());
        };

        let version = Regex::new(r"(\d+\.\d[\.\d]*)").unwrap();
        Ok(version
            .captures(&raw)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default())
    }

    /// Net site energy in GJ from the annual utility performance summary.
    pub fn net_site_energy(&self) -> Result<Option<f64>, ReportError> {
        let value = self
            .conn
            .query_row(
                "SELECT CAST(Value AS REAL) FROM TabularDataWithStrings
                   WHERE ReportName='AnnualBuildingUtilityPerformanceSummary'
                   AND ReportForString='Entire Facility'
                   AND TableName='Site and Source Energy'
                   AND RowName='Net Site Energy'
                   AND ColumnName='Total Energy'
                   AND Units='GJ'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Per-zone setpoint-not-met hours from the system summary report.
    pub fn unmet_hours_table(&self) -> Result<Vec<UnmetHoursRow>, ReportError> {
        let mut zones_stmt = self.conn.prepare(
            "SELECT DISTINCT(RowName) FROM TabularDataWithStrings
               WHERE ReportName='SystemSummary'
               AND ReportForString='Entire Facility'
               AND TableName='Time Setpoint Not Met'",
        )?;
        let zone_names: Vec<String> = zones_stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        let mut value_stmt = self.conn.prepare(
            "SELECT CAST(Value AS REAL) FROM TabularDataWithStrings
               WHERE ReportName='SystemSummary'
               AND ReportForString='Entire Facility'
               AND TableName='Time Setpoint Not Met'
               AND RowName=?1
               AND ColumnName=?2",
        )?;

        let mut rows = Vec::with_capacity(zone_names.len());
        for zone_name in zone_names {
            let mut vals = [0.0f64; 4];
            for (slot, column) in vals.iter_mut().zip(UNMET_HOURS_COLUMNS) {
                *slot = value_stmt
                    .query_row(params![zone_name, column], |row| row.get(0))
                    .optional()?
                    .unwrap_or(0.0);
            }
            rows.push(UnmetHoursRow {
                zone_name,
                during_heating: vals[0],
                during_cooling: vals[1],
                during_occ_heating: vals[2],
                during_occ_cooling: vals[3],
            });
        }
        Ok(rows)
    }

    /// End uses crossed with fuels from the annual utility performance
    /// summary, keeping only rows and columns whose total exceeds a small
    /// threshold, with units folded into the fuel names.
    pub fn end_use_by_fuel_table(&self) -> Result<EndUseTable, ReportError> {
        const THRESHOLD: f64 = 0.1;

        let mut table = EndUseTable::default();

        let all_end_uses: Vec<String> = self
            .conn
            .prepare(
                "SELECT DISTINCT(RowName) FROM TabularDataWithStrings
                   WHERE ReportName='AnnualBuildingUtilityPerformanceSummary'
                   AND ReportForString='Entire Facility'
                   AND TableName='End Uses'",
            )?
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        let all_fuels: Vec<String> = self
            .conn
            .prepare(
                "SELECT DISTINCT(ColumnName) FROM TabularDataWithStrings
                   WHERE ReportName='AnnualBuildingUtilityPerformanceSummary'
                   AND ReportForString='Entire Facility'
                   AND TableName='End Uses'",
            )?
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        // keep only the fuels with non-zero totals
        let mut fuel_total_stmt = self.conn.prepare(
            "SELECT CAST(Value AS REAL) FROM TabularDataWithStrings
               WHERE ReportName='AnnualBuildingUtilityPerformanceSummary'
               AND ReportForString='Entire Facility'
               AND TableName='End Uses'
               AND RowName='Total End Uses'
               AND ColumnName=?1",
        )?;
        for fuel in &all_fuels {
            let total: Option<f64> = fuel_total_stmt
                .query_row(params![fuel], |row| row.get(0))
                .optional()?;
            if total.is_some_and(|t| t > THRESHOLD) {
                table.fuel_names.push(fuel.clone());
            }
        }

        // keep only the end uses with non-zero totals
        let mut end_use_total_stmt = self.conn.prepare(
            "SELECT SUM(CAST(Value AS REAL)) FROM TabularDataWithStrings
               WHERE ReportName='AnnualBuildingUtilityPerformanceSummary'
               AND ReportForString='Entire Facility'
               AND TableName='End Uses'
               AND RowName=?1",
        )?;
        for end_use in &all_end_uses {
            // SUM over zero rows yields a single NULL, not an empty result
            let total: Option<f64> = end_use_total_stmt
                .query_row(params![end_use], |row| row.get::<_, Option<f64>>(0))
                .optional()?
                .flatten();
            if total.is_some_and(|t| t > THRESHOLD) {
                table.end_use_names.push(end_use.clone());
            }
        }

        let mut value_stmt = self.conn.prepare(
            "SELECT CAST(Value AS REAL) FROM TabularDataWithStrings
               WHERE ReportName='AnnualBuildingUtilityPerformanceSummary'
               AND ReportForString='Entire Facility'
               AND TableName='End Uses'
               AND RowName=?1
               AND ColumnName=?2",
        )?;
        for end_use in &table.end_use_names {
            let mut row_values = Vec::with_capacity(table.fuel_names.len());
            for fuel in &table.fuel_names {
                let value: Option<f64> = value_stmt
                    .query_row(params![end_use, fuel], |row| row.get(0))
                    .optional()?;
                row_values.push(value.unwrap_or(0.0));
            }
            table.values.push(row_values);
        }

        let mut units_stmt = self.conn.prepare(
            "SELECT DISTINCT(Units) FROM TabularDataWithStrings
               WHERE ReportName='AnnualBuildingUtilityPerformanceSummary'
               AND ReportForString='Entire Facility'
               AND TableName='End Uses'
               AND ColumnName=?1",
        )?;
        for fuel in table.fuel_names.iter_mut() {
            let units: Option<String> = units_stmt
                .query_row(params![&*fuel], |row| row.get(0))
                .optional()?;
            fuel.push_str(&format!(" [{}]", units.unwrap_or_default()));
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_db(dir: &Path) -> std::path::PathBuf {
        let path = dir.join(SQL_FILE_NAME);
        let conn = Connection::open(&path).expect("create db");
        conn.execute_batch(
            "CREATE TABLE Simulations (EnergyPlusVersion TEXT);
             CREATE TABLE TabularDataWithStrings (
                 ReportName TEXT, ReportForString TEXT, TableName TEXT,
                 RowName TEXT, ColumnName TEXT, Units TEXT, Value TEXT);
             INSERT INTO Simulations VALUES
                 ('EnergyPlus, Version 22.2.0-c249759bad, YMD=2022.09.28 18:33');",
        )
        .expect("schema");

        let mut insert = conn
            .prepare("INSERT INTO TabularDataWithStrings VALUES (?1,?2,?3,?4,?5,?6,?7)")
            .expect("prepare");
        let mut tabular = |table: &str, row: &str, col: &str, units: &str, value: &str| {
            insert
                .execute(params![
                    "AnnualBuildingUtilityPerformanceSummary",
                    "Entire Facility",
                    table,
                    row,
                    col,
                    units,
                    value
                ])
                .expect("insert");
        };

        tabular("Site and Source Energy", "Net Site Energy", "Total Energy", "GJ", "225.18");
        for (row, elec, gas) in [
            ("Heating", "0.0", "68.55"),
            ("Cooling", "16.42", "0.0"),
            ("Interior Lighting", "81.24", "0.0"),
            ("Exterior Lighting", "0.0", "0.0"),
            ("Total End Uses", "97.66", "68.55"),
        ] {
            tabular("End Uses", row, "Electricity", "GJ", elec);
            tabular("End Uses", row, "Natural Gas", "GJ", gas);
            tabular("End Uses", row, "District Cooling", "GJ", "0.0");
        }

        let mut unmet = |zone: &str, col: &str, value: &str| {
            insert
                .execute(params![
                    "SystemSummary",
                    "Entire Facility",
                    "Time Setpoint Not Met",
                    zone,
                    col,
                    "Hours",
                    value
                ])
                .expect("insert");
        };
        unmet("SPACE1-1", "During Heating", "172.0");
        unmet("SPACE1-1", "During Cooling", "52.5");
        unmet("SPACE1-1", "During Occupied Heating", "3.25");
        unmet("SPACE1-1", "During Occupied Cooling", "52.5");

        path
    }

    #[test]
    fn version_and_net_site_energy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let reports = SqliteReports::open(&fixture_db(dir.path())).expect("open");

        assert_eq!(reports.energyplus_version().expect("version"), "22.2.0");
        assert_eq!(
            reports.net_site_energy().expect("net site energy"),
            Some(225.18)
        );
    }

    #[test]
    fn unmet_hours_rows_follow_column_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let reports = SqliteReports::open(&fixture_db(dir.path())).expect("open");

        let rows = reports.unmet_hours_table().expect("unmet hours");
        assert_eq!(
            rows,
            vec![UnmetHoursRow {
                zone_name: "SPACE1-1".into(),
                during_heating: 172.0,
                during_cooling: 52.5,
                during_occ_heating: 3.25,
                during_occ_cooling: 52.5,
            }]
        );
    }

    #[test]
    fn end_use_table_drops_zero_rows_and_columns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let reports = SqliteReports::open(&fixture_db(dir.path())).expect("open");

        let table = reports.end_use_by_fuel_table().expect("end uses");
        assert_eq!(
            table.fuel_names,
            vec!["Electricity [GJ]", "Natural Gas [GJ]"]
        );
        assert!(!table.end_use_names.contains(&"Exterior Lighting".to_string()));
        assert_eq!(table.end_use_names.len(), table.values.len());
        let heating = table
            .end_use_names
            .iter()
            .position(|n| n == "Heating")
            .expect("heating row");
        assert_eq!(table.values[heating], vec![0.0, 68.55]);
    }

    #[test]
    fn non_database_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SQL_FILE_NAME);
        std::fs::write(&path, "not a database").expect("write");

        assert!(SqliteReports::open(&path).is_err());
    }
}
