//! Dataset loading: bundled CSV snapshot or an on-disk directory.
//!
//! The reference data ships inside the binary via `include_str!`, so the
//! common path needs no files at runtime. `load_from_dir` reads the same
//! five-file layout from disk for corrected or newer snapshots.
//!
//! All dataset invariants are checked here, while the source record is
//! still in scope: code shape, key uniqueness per level, and referential
//! integrity against the parent level. Every validation error names the
//! file stem and the 1-based record that caused it.

use std::path::Path;

use hashbrown::HashMap;
use serde::Deserialize;
use tracing::info;

use super::{DatasetError, GeoTable};
use crate::models::{AdminCode, ArrondissementKey, CommuneKey, DepartmentKey, Level};

const EMBEDDED_MANIFEST: &str = include_str!("../../data/manifest.toml");
const EMBEDDED_REGIONS: &str = include_str!("../../data/regions.csv");
const EMBEDDED_DEPARTMENTS: &str = include_str!("../../data/departments.csv");
const EMBEDDED_ARRONDISSEMENTS: &str = include_str!("../../data/arrondissements.csv");
const EMBEDDED_COMMUNES: &str = include_str!("../../data/communes.csv");

const REGIONS: &str = "regions";
const DEPARTMENTS: &str = "departments";
const ARRONDISSEMENTS: &str = "arrondissements";
const COMMUNES: &str = "communes";

#[derive(Debug, Deserialize)]
struct Manifest {
    dataset: DatasetSection,
}

#[derive(Debug, Deserialize)]
struct DatasetSection {
    version: String,
    country: String,
    source: String,
}

#[derive(Debug, Deserialize)]
struct RegionRow {
    region: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DepartmentRow {
    region: String,
    department: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ArrondissementRow {
    region: String,
    department: String,
    arrondissement: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CommuneRow {
    region: String,
    department: String,
    arrondissement: String,
    commune: String,
    name: String,
}

/// Load the dataset bundled into the binary at compile time.
pub fn load_embedded() -> Result<GeoTable, DatasetError> {
    build_table(
        EMBEDDED_MANIFEST,
        EMBEDDED_REGIONS,
        EMBEDDED_DEPARTMENTS,
        EMBEDDED_ARRONDISSEMENTS,
        EMBEDDED_COMMUNES,
    )
}

/// Load a dataset directory holding `manifest.toml` plus the four CSV files.
pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<GeoTable, DatasetError> {
    let dir = dir.as_ref();
    let manifest = read_file(&dir.join("manifest.toml"))?;
    let regions = read_file(&dir.join("regions.csv"))?;
    let departments = read_file(&dir.join("departments.csv"))?;
    let arrondissements = read_file(&dir.join("arrondissements.csv"))?;
    let communes = read_file(&dir.join("communes.csv"))?;
    build_table(&manifest, &regions, &departments, &arrondissements, &communes)
}

fn read_file(path: &Path) -> Result<String, DatasetError> {
    std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn build_table(
    manifest: &str,
    regions: &str,
    departments: &str,
    arrondissements: &str,
    communes: &str,
) -> Result<GeoTable, DatasetError> {
    let manifest: Manifest = toml::from_str(manifest)?;
    info!(
        "Loading dataset {} ({}) from {}",
        manifest.dataset.version, manifest.dataset.country, manifest.dataset.source
    );

    // Levels parse top-down so every file's rows can be checked against the
    // parent level's finished map, with the offending record still in scope.
    let regions = parse_regions(regions)?;
    let departments = parse_departments(departments, &regions)?;
    let arrondissements = parse_arrondissements(arrondissements, &departments)?;
    let communes = parse_communes(communes, &arrondissements)?;

    Ok(GeoTable::new(
        manifest.dataset.version,
        regions,
        departments,
        arrondissements,
        communes,
    ))
}

fn parse_regions(data: &str) -> Result<HashMap<AdminCode, String>, DatasetError> {
    let mut reader = csv_reader(data);
    let mut rows = HashMap::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let row: RegionRow = result.map_err(|source| DatasetError::Csv {
            file: REGIONS,
            source,
        })?;
        let record = idx + 1;
        let region = parse_code(REGIONS, record, &row.region)?;
        if rows.insert(region, row.name).is_some() {
            return Err(DatasetError::DuplicateKey {
                file: REGIONS,
                record,
                level: Level::Region,
                key: region.to_string(),
            });
        }
    }
    Ok(rows)
}

fn parse_departments(
    data: &str,
    regions: &HashMap<AdminCode, String>,
) -> Result<HashMap<DepartmentKey, String>, DatasetError> {
    let mut reader = csv_reader(data);
    let mut rows = HashMap::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let row: DepartmentRow = result.map_err(|source| DatasetError::Csv {
            file: DEPARTMENTS,
            source,
        })?;
        let record = idx + 1;
        let region = parse_code(DEPARTMENTS, record, &row.region)?;
        let department = parse_code(DEPARTMENTS, record, &row.department)?;
        let key = DepartmentKey::new(region, department);
        if !regions.contains_key(&key.region) {
            return Err(DatasetError::OrphanRecord {
                file: DEPARTMENTS,
                record,
                level: Level::Department,
                key: key.to_string(),
                parent: key.region.to_string(),
            });
        }
        if rows.insert(key, row.name).is_some() {
            return Err(DatasetError::DuplicateKey {
                file: DEPARTMENTS,
                record,
                level: Level::Department,
                key: key.to_string(),
            });
        }
    }
    Ok(rows)
}

fn parse_arrondissements(
    data: &str,
    departments: &HashMap<DepartmentKey, String>,
) -> Result<HashMap<ArrondissementKey, String>, DatasetError> {
    let mut reader = csv_reader(data);
    let mut rows = HashMap::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let row: ArrondissementRow = result.map_err(|source| DatasetError::Csv {
            file: ARRONDISSEMENTS,
            source,
        })?;
        let record = idx + 1;
        let region = parse_code(ARRONDISSEMENTS, record, &row.region)?;
        let department = parse_code(ARRONDISSEMENTS, record, &row.department)?;
        let arrondissement = parse_code(ARRONDISSEMENTS, record, &row.arrondissement)?;
        let key = ArrondissementKey::new(region, department, arrondissement);
        if !departments.contains_key(&key.department_key()) {
            return Err(DatasetError::OrphanRecord {
                file: ARRONDISSEMENTS,
                record,
                level: Level::Arrondissement,
                key: key.to_string(),
                parent: key.department_key().to_string(),
            });
        }
        if rows.insert(key, row.name).is_some() {
            return Err(DatasetError::DuplicateKey {
                file: ARRONDISSEMENTS,
                record,
                level: Level::Arrondissement,
                key: key.to_string(),
            });
        }
    }
    Ok(rows)
}

fn parse_communes(
    data: &str,
    arrondissements: &HashMap<ArrondissementKey, String>,
) -> Result<HashMap<CommuneKey, String>, DatasetError> {
    let mut reader = csv_reader(data);
    let mut rows = HashMap::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let row: CommuneRow = result.map_err(|source| DatasetError::Csv {
            file: COMMUNES,
            source,
        })?;
        let record = idx + 1;
        let region = parse_code(COMMUNES, record, &row.region)?;
        let department = parse_code(COMMUNES, record, &row.department)?;
        let arrondissement = parse_code(COMMUNES, record, &row.arrondissement)?;
        let commune = parse_code(COMMUNES, record, &row.commune)?;
        let key = CommuneKey::new(region, department, arrondissement, commune);
        if !arrondissements.contains_key(&key.arrondissement_key()) {
            return Err(DatasetError::OrphanRecord {
                file: COMMUNES,
                record,
                level: Level::Commune,
                key: key.to_string(),
                parent: key.arrondissement_key().to_string(),
            });
        }
        if rows.insert(key, row.name).is_some() {
            return Err(DatasetError::DuplicateKey {
                file: COMMUNES,
                record,
                level: Level::Commune,
                key: key.to_string(),
            });
        }
    }
    Ok(rows)
}

fn csv_reader(data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes())
}

fn parse_code(file: &'static str, record: usize, value: &str) -> Result<AdminCode, DatasetError> {
    AdminCode::parse(value).ok_or_else(|| DatasetError::BadCode {
        file,
        record,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_embedded_dataset_loads() {
        let table = load_embedded().unwrap();
        assert_eq!(table.version(), "2019-07");
        assert_eq!(table.count(Level::Region), 14);
        assert_eq!(table.count(Level::Department), 45);
        assert_eq!(table.count(Level::Arrondissement), 135);
        assert_eq!(table.count(Level::Commune), 75);
    }

    #[test]
    fn test_embedded_known_units() {
        let table = load_embedded().unwrap();
        let region = AdminCode::parse("01").unwrap();
        assert_eq!(table.region_name(&region), Some("Dakar"));

        let thies = ArrondissementKey::parse("07", "02", "04").unwrap();
        assert_eq!(table.arrondissement_name(&thies), Some("Thiès"));

        let mermoz = CommuneKey::parse("01", "01", "01", "01").unwrap();
        assert_eq!(table.commune_name(&mermoz), Some("Mermoz-Sacré-Cœur"));

        let unknown = AdminCode::parse("99").unwrap();
        assert_eq!(table.region_name(&unknown), None);
    }

    #[test]
    fn test_embedded_hierarchy_is_closed() {
        // Every unit must be reachable by walking parent listings downwards,
        // so the per-level counts seen on the walk match the table's counts.
        let table = load_embedded().unwrap();
        let mut departments = 0;
        let mut arrondissements = 0;
        let mut communes = 0;
        for (region, _) in table.regions() {
            for (department, _) in table.departments_of(&region) {
                departments += 1;
                for (arrondissement, _) in table.arrondissements_of(&department) {
                    arrondissements += 1;
                    communes += table.communes_of(&arrondissement).len();
                }
            }
        }
        assert_eq!(departments, table.count(Level::Department));
        assert_eq!(arrondissements, table.count(Level::Arrondissement));
        assert_eq!(communes, table.count(Level::Commune));
    }

    fn write_dataset(
        dir: &Path,
        regions: &str,
        departments: &str,
        arrondissements: &str,
        communes: &str,
    ) {
        fs::write(
            dir.join("manifest.toml"),
            "[dataset]\nversion = \"test\"\ncountry = \"SN\"\nsource = \"fixture\"\n",
        )
        .unwrap();
        fs::write(dir.join("regions.csv"), regions).unwrap();
        fs::write(dir.join("departments.csv"), departments).unwrap();
        fs::write(dir.join("arrondissements.csv"), arrondissements).unwrap();
        fs::write(dir.join("communes.csv"), communes).unwrap();
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "region,name\n01,Dakar\n",
            "region,department,name\n01,01,Dakar\n",
            "region,department,arrondissement,name\n01,01,01,Almadies\n",
            "region,department,arrondissement,commune,name\n01,01,01,04,Yoff\n",
        );
        let table = load_from_dir(dir.path()).unwrap();
        assert_eq!(table.version(), "test");
        assert_eq!(table.len(), 4);
        let yoff = CommuneKey::parse("01", "01", "01", "04").unwrap();
        assert_eq!(table.commune_name(&yoff), Some("Yoff"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        // No files at all: the manifest is the first thing opened
        let err = load_from_dir(dir.path()).unwrap_err();
        match err {
            DatasetError::Read { path, .. } => assert!(path.ends_with("manifest.toml")),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_code_reports_file_and_record() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "region,name\n01,Dakar\n1,Broken\n",
            "region,department,name\n",
            "region,department,arrondissement,name\n",
            "region,department,arrondissement,commune,name\n",
        );
        let err = load_from_dir(dir.path()).unwrap_err();
        match err {
            DatasetError::BadCode {
                file,
                record,
                value,
            } => {
                assert_eq!(file, "regions");
                assert_eq!(record, 2);
                assert_eq!(value, "1");
            }
            other => panic!("expected bad code error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_row_reports_file_and_record() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "region,name\n01,Dakar\n",
            "region,department,name\n01,01,Dakar\n01,02,Guédiawaye\n01,01,Dakar bis\n",
            "region,department,arrondissement,name\n",
            "region,department,arrondissement,commune,name\n",
        );
        let err = load_from_dir(dir.path()).unwrap_err();
        match err {
            DatasetError::DuplicateKey {
                file,
                record,
                level,
                key,
            } => {
                assert_eq!(file, "departments");
                assert_eq!(record, 3);
                assert_eq!(level, Level::Department);
                assert_eq!(key, "01/01");
            }
            other => panic!("expected duplicate key error, got {other:?}"),
        }
    }

    #[test]
    fn test_orphan_row_reports_file_and_record() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "region,name\n01,Dakar\n",
            "region,department,name\n01,01,Dakar\n02,01,Bignona\n",
            "region,department,arrondissement,name\n",
            "region,department,arrondissement,commune,name\n",
        );
        let err = load_from_dir(dir.path()).unwrap_err();
        match err {
            DatasetError::OrphanRecord {
                file,
                record,
                level,
                parent,
                ..
            } => {
                assert_eq!(file, "departments");
                assert_eq!(record, 2);
                assert_eq!(level, Level::Department);
                assert_eq!(parent, "02");
            }
            other => panic!("expected orphan error, got {other:?}"),
        }
    }

    #[test]
    fn test_orphan_commune_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "region,name\n01,Dakar\n",
            "region,department,name\n01,01,Dakar\n",
            "region,department,arrondissement,name\n01,01,01,Almadies\n",
            "region,department,arrondissement,commune,name\n01,01,02,01,Ngor\n",
        );
        let err = load_from_dir(dir.path()).unwrap_err();
        match err {
            DatasetError::OrphanRecord {
                level, key, parent, ..
            } => {
                assert_eq!(level, Level::Commune);
                assert_eq!(key, "01/01/02/01");
                assert_eq!(parent, "01/01/02");
            }
            other => panic!("expected orphan error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_csv_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "region,name\n01\n",
            "region,department,name\n",
            "region,department,arrondissement,name\n",
            "region,department,arrondissement,commune,name\n",
        );
        let err = load_from_dir(dir.path()).unwrap_err();
        match err {
            DatasetError::Csv { file, .. } => assert_eq!(file, "regions"),
            other => panic!("expected csv error, got {other:?}"),
        }
    }
}
