use std::path::{Path, PathBuf};

use crate::error::DataLoadError;

/// Number of principal components every record carries.
pub const COMPONENTS: usize = 3;

/// One row of the dataset. `index` is the row position in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub index: usize,
    pub components: [f64; COMPONENTS],
    pub label: String,
}

/// Names of the columns the records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub components: [String; COMPONENTS],
    pub label: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            components: [
                "Principal component 1".to_string(),
                "Principal component 2".to_string(),
                "Principal component 3".to_string(),
            ],
            label: "Target".to_string(),
        }
    }
}

/// All records in file order. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn load(path: &Path, columns: &ColumnNames) -> Result<Dataset, DataLoadError> {
        log::info!("loading dataset from {:?}", path);
        let parser = turbo_csv::Parser::from_path(path).map_err(|source| DataLoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_parser(parser, columns, path)
    }

    /// Same as `load`, for text that is already in memory. `origin` is only
    /// used in error messages.
    pub fn parse(text: &str, columns: &ColumnNames, origin: &Path) -> Result<Dataset, DataLoadError> {
        Self::from_parser(
            turbo_csv::Parser::from_string(text.to_owned()),
            columns,
            origin,
        )
    }

    fn from_parser(
        parser: turbo_csv::Parser,
        columns: &ColumnNames,
        origin: &Path,
    ) -> Result<Dataset, DataLoadError> {
        let path = || origin.to_path_buf();
        let table = parser
            .parse_table()
            .map_err(|source| DataLoadError::Malformed {
                path: path(),
                source,
            })?;

        let find_column = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    path: path(),
                    column: name.to_owned(),
                })
        };
        let label_col = find_column(&columns.label)?;
        let mut component_cols = [0; COMPONENTS];
        for (col, name) in component_cols.iter_mut().zip(&columns.components) {
            *col = find_column(name)?;
        }

        if table.is_empty() {
            return Err(DataLoadError::Empty { path: path() });
        }

        let records = table
            .rows
            .iter()
            .zip(&table.row_lines)
            .enumerate()
            .map(|(index, (row, line))| {
                let mut components = [0.0; COMPONENTS];
                for (k, value) in components.iter_mut().enumerate() {
                    let cell = &row[component_cols[k]];
                    *value = cell
                        .parse::<f64>()
                        .map_err(|_| DataLoadError::InvalidNumber {
                            path: path(),
                            line: *line,
                            column: columns.components[k].clone(),
                            value: cell.clone(),
                        })?;
                }
                Ok(Record {
                    index,
                    components,
                    label: row[label_col].clone(),
                })
            })
            .collect::<Result<Vec<_>, DataLoadError>>()?;

        log::info!("loaded {} records", records.len());
        Ok(Dataset { records })
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(|r| r.label.clone()).collect()
    }
}

impl From<Vec<(f64, f64, f64, &str)>> for Dataset {
    fn from(rows: Vec<(f64, f64, f64, &str)>) -> Self {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, (a, b, c, label))| Record {
                index,
                components: [a, b, c],
                label: label.to_owned(),
            })
            .collect();
        Dataset { records }
    }
}

/// Default location of the dataset, relative to the working directory.
pub fn default_data_path() -> PathBuf {
    PathBuf::from("PCA_galena_grains.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn columns() -> ColumnNames {
        ColumnNames {
            components: ["pc1".into(), "pc2".into(), "pc3".into()],
            label: "label".into(),
        }
    }

    fn parse(text: &str) -> Result<Dataset, DataLoadError> {
        Dataset::parse(text, &columns(), Path::new("test.csv"))
    }

    #[test]
    fn test_records_follow_row_order() {
        init();
        let dataset = parse("label,pc1,pc2,pc3\na.png,1,2,3\nb.png,-1.5,0,2e-1\n").unwrap();
        assert_eq!(dataset.len(), 2);
        let b = dataset.get(1).unwrap();
        assert_eq!(b.index, 1);
        assert_eq!(b.label, "b.png");
        assert_eq!(b.components, [-1.5, 0.0, 0.2]);
        let indices: Vec<_> = dataset.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        init();
        let dataset = parse(",pc3,pc2,pc1,label,extra\n0,3,2,1,a.png,x\n").unwrap();
        assert_eq!(dataset.get(0).unwrap().components, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_default_column_names() {
        init();
        let text = "Principal component 1,Principal component 2,Principal component 3,Target\n\
                    0.5,0.25,0.125,grain_01.png\n";
        let dataset = Dataset::parse(text, &ColumnNames::default(), Path::new("pca.csv")).unwrap();
        assert_eq!(dataset.get(0).unwrap().label, "grain_01.png");
    }

    #[test]
    fn test_missing_column() {
        init();
        let err = parse("label,pc1,pc2\na.png,1,2\n").unwrap_err();
        assert!(
            matches!(err, DataLoadError::MissingColumn { ref column, .. } if column == "pc3"),
            "{err}"
        );
    }

    #[test]
    fn test_invalid_number() {
        init();
        let err = parse("label,pc1,pc2,pc3\na.png,1,2,3\nb.png,1,two,3\n").unwrap_err();
        match err {
            DataLoadError::InvalidNumber {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "pc2");
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_and_empty() {
        init();
        assert!(matches!(
            parse("label,pc1,pc2,pc3\na.png,1,2\n"),
            Err(DataLoadError::Malformed { .. })
        ));
        assert!(matches!(
            parse("label,pc1,pc2,pc3\n"),
            Err(DataLoadError::Empty { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        init();
        let err = Dataset::load(Path::new("/definitely/not/here.csv"), &columns()).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }
}
