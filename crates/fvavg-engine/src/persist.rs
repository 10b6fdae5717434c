//! Writes a completed run to the fixed FVAvg output schema (§6).

use std::path::Path;

use fvavg_core::{BreathScalars, FvavgError, FvavgResult, PhaseBins};
use fvavg_io::WorkbookWriter;

use crate::pipeline::FvavgRun;

pub fn write_fvavg_output(run: &FvavgRun, path: &Path) -> FvavgResult<()> {
    let mut writer = WorkbookWriter::new();

    write_zeroed_raw_data(&mut writer, run)?;

    for (i, breath) in run.breaths.iter().enumerate() {
        write_breath_bins(&mut writer, &format!("Not Normalized Time Bin Breath {i}"), &breath.time_bins_raw.insp, &breath.time_bins_raw.exp)?;
        write_breath_bins(&mut writer, &format!("Normalized Time Bin Breath {i}"), &breath.time_bins_normalized.insp, &breath.time_bins_normalized.exp)?;
        write_breath_bins(&mut writer, &format!("Volume Bin Breath {i}"), &breath.volume_bins.insp, &breath.volume_bins.exp)?;
        write_original_breath(&mut writer, &format!("Original Breath {i}"), breath)?;
    }

    write_comparison(&mut writer, "Comparison_Purposes_tbin", run, Scheme::Time, |b| &b.time_bins_raw)?;
    write_comparison(&mut writer, "Comparison_Purposes_vbin", run, Scheme::Volume, |b| &b.volume_bins)?;

    write_tidal_volume_and_time(&mut writer, run)?;

    write_avg_bin_data(&mut writer, "Avg Time Bin Data", &run.time_loop)?;
    write_avg_bin_data(&mut writer, "Avg Vol Bin Data", &run.volume_loop)?;

    writer
        .save(path)
        .map_err(|e| FvavgError::Write(e.to_string()))
}

fn write_zeroed_raw_data(writer: &mut WorkbookWriter, run: &FvavgRun) -> FvavgResult<()> {
    let idx = writer
        .add_sheet("Zeroed_Raw_Data")
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    writer
        .write_columns(
            idx,
            0,
            &[
                ("Time", &run.augmented.t),
                ("Vol", &run.augmented.v),
                ("Flow", &run.augmented.f),
            ],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}

fn write_breath_bins(writer: &mut WorkbookWriter, name: &str, insp: &PhaseBins, exp: &PhaseBins) -> FvavgResult<()> {
    let idx = writer.add_sheet(name).map_err(|e| FvavgError::Write(e.to_string()))?;
    writer
        .write_columns(
            idx,
            0,
            &[
                ("Insp_Time", &insp.time),
                ("Insp_Vol", &insp.vol),
                ("Insp_Flow", &insp.flow),
                ("Exp_Time", &exp.time),
                ("Exp_Vol", &exp.vol),
                ("Exp_Flow", &exp.flow),
            ],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}

fn write_original_breath(writer: &mut WorkbookWriter, name: &str, breath: &fvavg_core::Breath) -> FvavgResult<()> {
    let idx = writer.add_sheet(name).map_err(|e| FvavgError::Write(e.to_string()))?;
    let row = writer
        .write_columns(
            idx,
            0,
            &[
                ("Insp_Time", &breath.original_insp.t),
                ("Insp_Vol", &breath.original_insp.v),
                ("Insp_Flow", &breath.original_insp.f),
            ],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    writer
        .write_columns(
            idx,
            row,
            &[
                ("Exp_Time", &breath.original_exp.t),
                ("Exp_Vol", &breath.original_exp.v),
                ("Exp_Flow", &breath.original_exp.f),
            ],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}

/// Which aggregated loop a `write_comparison` sheet's `Avg_*`/`SEM(*)`
/// columns are pulled from.
enum Scheme {
    Time,
    Volume,
}

fn write_comparison(
    writer: &mut WorkbookWriter,
    name: &str,
    run: &FvavgRun,
    scheme: Scheme,
    select: impl Fn(&fvavg_core::Breath) -> &fvavg_core::BreathBins,
) -> FvavgResult<()> {
    let idx = writer.add_sheet(name).map_err(|e| FvavgError::Write(e.to_string()))?;

    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
    for (i, breath) in run.breaths.iter().enumerate() {
        let bins = select(breath);
        columns.push((format!("InspVol_{i}"), bins.insp.vol.clone()));
        columns.push((format!("ExpVol_{i}"), bins.exp.vol.clone()));
        columns.push((format!("InspFlow_{i}"), bins.insp.flow.clone()));
        columns.push((format!("ExpFlow_{i}"), bins.exp.flow.clone()));
    }

    let agg = match scheme {
        Scheme::Time => &run.time_loop,
        Scheme::Volume => &run.volume_loop,
    };
    columns.push(("Avg_Insp_Vol".to_string(), agg.insp.vol_mean.clone()));
    columns.push(("SEM(aivt)".to_string(), agg.insp.vol_sd.clone()));
    columns.push(("Avg_Exp_Vol".to_string(), agg.exp.vol_mean.clone()));
    columns.push(("SEM(aevt)".to_string(), agg.exp.vol_sd.clone()));
    columns.push(("Avg_Insp_Flow".to_string(), agg.insp.flow_mean.clone()));
    columns.push(("SEM(aift)".to_string(), agg.insp.flow_sd.clone()));
    columns.push(("Avg_Exp_Flow".to_string(), agg.exp.flow_mean.clone()));
    columns.push(("SEM(aeft)".to_string(), agg.exp.flow_sd.clone()));

    let refs: Vec<(&str, &[f64])> = columns.iter().map(|(n, v)| (n.as_str(), v.as_slice())).collect();
    writer
        .write_columns(idx, 0, &refs)
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}

fn write_tidal_volume_and_time(writer: &mut WorkbookWriter, run: &FvavgRun) -> FvavgResult<()> {
    let idx = writer
        .add_sheet("Tidal Volume and Time Data")
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    let scalars: Vec<&BreathScalars> = run.breaths.iter().map(|b| &b.scalars).collect();
    let vt_insp: Vec<f64> = scalars.iter().map(|s| s.vt_insp).collect();
    let vt_exp: Vec<f64> = scalars.iter().map(|s| s.vt_exp).collect();
    let tt_insp: Vec<f64> = scalars.iter().map(|s| s.tt_insp).collect();
    let tt_exp: Vec<f64> = scalars.iter().map(|s| s.tt_exp).collect();

    writer
        .write_columns(
            idx,
            0,
            &[
                ("Inspiratory Tidal Volume", &vt_insp),
                ("Expiratory Tidal Volumes", &vt_exp),
                ("Inspiratory Total Time", &tt_insp),
                ("Expiratory Total Time", &tt_exp),
            ],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}

fn write_avg_bin_data(writer: &mut WorkbookWriter, name: &str, agg: &fvavg_core::AggregatedLoop) -> FvavgResult<()> {
    let idx = writer.add_sheet(name).map_err(|e| FvavgError::Write(e.to_string()))?;
    writer
        .write_columns(
            idx,
            0,
            &[
                ("Avg_Insp_Vol_Graph", &agg.insp.vol_mean),
                ("Avg_Insp_Flow_Graph", &agg.insp.flow_mean),
                ("Avg_Exp_Vol_Graph", &agg.exp.vol_mean),
                ("Avg_Exp_Flow_Graph", &agg.exp.flow_mean),
            ],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;
    Ok(())
}
