use std::{fmt::Write, fs, path::Path};

use anyhow::{Context, ensure};
use itertools::Itertools;
use serde::Serialize;

use crate::extinction::Series;

/// Renders curves as CSV with a leading `t` column. Every series must have the same length.
pub fn curves_csv(series: &[Series]) -> anyhow::Result<String> {
    let len = series.first().map_or(0, |series| series.values.len());
    ensure!(
        series.iter().all(|series| series.values.len() == len),
        "Series lengths differ"
    );

    let mut csv = String::new();
    writeln!(csv, "t,{}", series.iter().map(|series| &series.label).join(","))?;

    for t in 0..len {
        let row = series.iter().map(|series| series.values[t]).join(",");
        writeln!(csv, "{t},{row}")?;
    }

    Ok(csv)
}

pub fn save_curves<P>(path: P, series: &[Series]) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    let csv = curves_csv(series)?;
    write_creating_parent(path.as_ref(), csv).context("Couldn't write curves")
}

pub fn save_json<P, T>(path: P, value: &T) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let serialized = serde_json::to_string_pretty(value).context("Couldn't serialize output")?;
    write_creating_parent(path.as_ref(), serialized).context("Couldn't write output")
}

fn write_creating_parent(path: &Path, contents: String) -> anyhow::Result<()> {
    if let Some(parent_path) = path.parent() {
        fs::create_dir_all(parent_path).context("Couldn't create output directory")?;
    }

    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_time_column() {
        let series = [
            Series {
                label: "dl_30".to_owned(),
                values: vec![1.0, 0.5],
            },
            Series {
                label: "gol_30".to_owned(),
                values: vec![1.0, 0.25],
            },
        ];

        assert_eq!(curves_csv(&series).unwrap(), "t,dl_30,gol_30\n0,1,1\n1,0.5,0.25\n");
    }

    #[test]
    fn csv_rejects_ragged_series() {
        let series = [
            Series {
                label: "a".to_owned(),
                values: vec![1.0],
            },
            Series {
                label: "b".to_owned(),
                values: vec![1.0, 0.5],
            },
        ];

        assert!(curves_csv(&series).is_err());
    }
}
