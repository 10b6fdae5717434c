//! Writes the cross-subject consolidated workbook (§6, "Output file
//! (Consolidator)"): `Raw Data`, `Individual Data`, `Averages`,
//! `Absolute Volume Data`, `Normalized Average Data`, each with TLC
//! summary rows appended below the data as annotations.

use std::path::Path;

use fvavg_core::FvavgError;
use fvavg_io::WorkbookWriter;

use crate::table::CrossSubjectTable;

pub fn write_cross_subject_table(table: &CrossSubjectTable, path: &Path) -> Result<(), FvavgError> {
    let mut writer = WorkbookWriter::new();

    write_raw_data(&mut writer, table)?;
    write_individual_data(&mut writer, table)?;
    write_averages(&mut writer, table)?;
    write_absolute_volume_data(&mut writer, table)?;
    write_normalized_average_data(&mut writer, table)?;

    writer.save(path).map_err(|e| FvavgError::Write(e.to_string()))
}

fn write_raw_data(writer: &mut WorkbookWriter, table: &CrossSubjectTable) -> Result<(), FvavgError> {
    let idx = writer
        .add_sheet("Raw Data")
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
    for (id, raw_vol) in table.ids.iter().zip(&table.raw_vol) {
        columns.push((format!("Raw Vol {id}"), raw_vol.clone()));
    }
    for (id, flow) in table.ids.iter().zip(&table.flow) {
        columns.push((format!("Flow {id}"), flow.clone()));
    }

    let refs: Vec<(&str, &[f64])> = columns.iter().map(|(n, v)| (n.as_str(), v.as_slice())).collect();
    writer
        .write_columns(idx, 0, &refs)
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}

fn write_individual_data(writer: &mut WorkbookWriter, table: &CrossSubjectTable) -> Result<(), FvavgError> {
    let idx = writer
        .add_sheet("Individual Data")
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
    for (id, vol_pct) in table.ids.iter().zip(&table.vol_pct) {
        columns.push((format!("Vol % TLC {id}"), vol_pct.clone()));
    }
    for (id, flow) in table.ids.iter().zip(&table.flow) {
        columns.push((format!("Flow {id}"), flow.clone()));
    }

    let refs: Vec<(&str, &[f64])> = columns.iter().map(|(n, v)| (n.as_str(), v.as_slice())).collect();
    let next_row = writer
        .write_columns(idx, 0, &refs)
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    writer
        .write_labeled_values(idx, next_row + 2, &[("Average TLC", table.mean_tlc)])
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}

fn write_averages(writer: &mut WorkbookWriter, table: &CrossSubjectTable) -> Result<(), FvavgError> {
    let idx = writer
        .add_sheet("Averages")
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    let next_row = writer
        .write_columns(
            idx,
            0,
            &[
                ("Average Vol % TLC", &table.avg_vol_pct),
                ("Average Flow", &table.avg_flow),
            ],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    writer
        .write_labeled_values(idx, next_row + 2, &[("Average TLC", table.mean_tlc)])
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}

fn write_absolute_volume_data(writer: &mut WorkbookWriter, table: &CrossSubjectTable) -> Result<(), FvavgError> {
    let idx = writer
        .add_sheet("Absolute Volume Data")
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
    for (id, abs_vol) in table.ids.iter().zip(&table.absolute_vol) {
        columns.push((format!("Absolute Vol {id}"), abs_vol.clone()));
    }
    for (id, flow) in table.ids.iter().zip(&table.flow) {
        columns.push((format!("Flow {id}"), flow.clone()));
    }

    let refs: Vec<(&str, &[f64])> = columns.iter().map(|(n, v)| (n.as_str(), v.as_slice())).collect();
    let next_row = writer
        .write_columns(idx, 0, &refs)
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    writer
        .write_labeled_values(idx, next_row + 2, &[("Average TLC", table.mean_tlc)])
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}

fn write_normalized_average_data(writer: &mut WorkbookWriter, table: &CrossSubjectTable) -> Result<(), FvavgError> {
    let idx = writer
        .add_sheet("Normalized Average Data")
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    let normalized_vol: Vec<f64> = table
        .avg_vol_pct
        .iter()
        .map(|&p| p * table.mean_tlc / 100.0)
        .collect();

    let next_row = writer
        .write_columns(
            idx,
            0,
            &[
                ("Normalized Average Volume", &normalized_vol),
                ("Average Flow", &table.avg_flow),
                ("Volume StdDev", &table.vol_stddev),
                ("Flow StdDev", &table.flow_stddev),
            ],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    writer
        .write_labeled_values(
            idx,
            next_row + 2,
            &[("Average TLC", table.mean_tlc)],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}
