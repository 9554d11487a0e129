use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{BillingError, Result};
use crate::schema::{canonical_field, RawRow};

/// Read every equipment row from the fleet export at `path`, resolving the
/// header aliases once. Tolerates a UTF-8 byte-order mark on the first header.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let content = std::fs::read_to_string(path)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = rdr.headers()?.clone();
    let mapping: Vec<Option<&'static str>> = headers.iter().map(canonical_field).collect();
    if mapping.iter().all(Option::is_none) {
        return Err(BillingError::MissingHeader);
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row = RawRow::default();
        for (i, field) in mapping.iter().enumerate() {
            let Some(field) = field else { continue };
            let Some(value) = record.get(i) else { continue };
            let value = value.trim();
            if !value.is_empty() {
                row.set(field, value.to_string());
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Equipment number,Serial number,Item desc.,Customer name,Make,Model,Address,City,State,Zip,Location,IP address,MAC address,Install date";

    fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_rows_aliases_headers() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{HEADER}\n1001,SN-1,Copier,DHR,Kyocera,MA4500ifx,100 Main St,Austin,TX,78701,Room 2 CC: 4521,10.0.0.5,00:1A:2B:3C:4D:5E,2023-01-01\n"
        );
        let path = write_csv(dir.path(), "fleet.csv", &content);
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].equipment_number.as_deref(), Some("1001"));
        assert_eq!(rows[0].model.as_deref(), Some("MA4500ifx"));
        assert_eq!(rows[0].location.as_deref(), Some("Room 2 CC: 4521"));
        assert_eq!(rows[0].install_date.as_deref(), Some("2023-01-01"));
    }

    #[test]
    fn test_read_rows_blank_cells_become_none() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{HEADER}\n1002,SN-2,Copier,DHR,Kyocera,M5526cdw,1 Elm,Austin,TX,,Lab CC: 9,  ,,2023-06-15\n"
        );
        let path = write_csv(dir.path(), "fleet.csv", &content);
        let rows = read_rows(&path).unwrap();
        assert!(rows[0].zip.is_none());
        assert!(rows[0].ip_address.is_none());
        assert!(rows[0].mac_address.is_none());
    }

    #[test]
    fn test_read_rows_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "\u{feff}{HEADER}\n1003,SN-3,Copier,DHR,Kyocera,MZ4000i,1 Elm,Austin,TX,78701,Dock CC: 12,,,2022-03-01\n"
        );
        let path = write_csv(dir.path(), "fleet.csv", &content);
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].equipment_number.as_deref(), Some("1003"));
    }

    #[test]
    fn test_read_rows_ignores_unknown_columns() {
        let dir = tempfile::tempdir().unwrap();
        let content = "Equipment number,Warranty,Model\n1004,3yr,P2040dw\n";
        let path = write_csv(dir.path(), "fleet.csv", content);
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].equipment_number.as_deref(), Some("1004"));
        assert_eq!(rows[0].model.as_deref(), Some("P2040dw"));
        assert!(rows[0].serial_number.is_none());
    }

    #[test]
    fn test_read_rows_rejects_unrecognized_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "junk.csv", "a,b,c\n1,2,3\n");
        assert!(matches!(read_rows(&path), Err(BillingError::MissingHeader)));
    }

    #[test]
    fn test_read_rows_values_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{HEADER}\n 1005 , SN-5 ,Copier,DHR,Kyocera, M2635dw ,1 Elm,Austin,TX,78701, Lab CC: 77 ,,,2023-02-01\n"
        );
        let path = write_csv(dir.path(), "fleet.csv", &content);
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].equipment_number.as_deref(), Some("1005"));
        assert_eq!(rows[0].model.as_deref(), Some("M2635dw"));
        assert_eq!(rows[0].location.as_deref(), Some("Lab CC: 77"));
    }
}
