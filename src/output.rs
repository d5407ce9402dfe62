// src/output.rs
//! Chart export: scenario grids and surfaces to CSV or JSON files

use crate::error::PnlResult;
use crate::metrics::PnlSurface;
use crate::scenario::ScenarioSet;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One row per price point; P&L columns are named `pnl_d{days}`
pub fn write_scenarios_csv<W: Write>(out: &mut W, set: &ScenarioSet) -> PnlResult<()> {
    write!(out, "price_change_percent,absolute_price,probability_weight")?;
    for days in set.days_axis() {
        write!(out, ",pnl_d{}", days)?;
    }
    writeln!(out, ",iv_crush_low,iv_crush_medium,iv_crush_high")?;

    for p in &set.points {
        write!(
            out,
            "{},{},{}",
            p.price_change_percent, p.absolute_price, p.probability_weight
        )?;
        for pnl in &p.pnl_by_day {
            write!(out, ",{}", pnl)?;
        }
        match p.iv_crush_variants {
            Some(c) => writeln!(out, ",{},{},{}", c.low, c.medium, c.high)?,
            None => writeln!(out, ",,,")?,
        }
    }
    Ok(())
}

/// Long format: `price_change_percent,days_to_expiration,pnl`
pub fn write_surface_csv<W: Write>(out: &mut W, surface: &PnlSurface) -> PnlResult<()> {
    writeln!(out, "price_change_percent,days_to_expiration,pnl")?;
    for ((i, j), pnl) in surface.pnl_matrix.indexed_iter() {
        writeln!(
            out,
            "{},{},{}",
            surface.price_changes[i], surface.days_to_expiration[j], pnl
        )?;
    }
    Ok(())
}

pub fn write_scenarios_to_csv<P: AsRef<Path>>(path: P, set: &ScenarioSet) -> PnlResult<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_scenarios_csv(&mut file, set)?;
    file.flush()?;
    Ok(())
}

pub fn write_surface_to_csv<P: AsRef<Path>>(path: P, surface: &PnlSurface) -> PnlResult<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_surface_csv(&mut file, surface)?;
    file.flush()?;
    Ok(())
}

pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> PnlResult<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}
