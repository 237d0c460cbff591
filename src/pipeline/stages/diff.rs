use std::io::{self, Write};

use console::style;
use tracing::info;

use crate::context::RunContext;
use crate::error::Result;
use crate::pipeline::Stage;
use crate::ui::write_diff;

/// Prints what the run changed in each chart file
pub struct DiffStage;

impl Stage for DiffStage {
    fn name(&self) -> &'static str {
        "diff"
    }

    fn description(&self) -> &'static str {
        "displaying changes to chart files"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        if !ctx.show_diff {
            info!("diff stage not enabled - skipping");
            return Ok(());
        }
        let stdout = io::stdout();
        write_changes(ctx, &mut stdout.lock())?;
        Ok(())
    }
}

fn write_changes(ctx: &RunContext, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", style("+----start diff").white())?;

    let chart = &ctx.chart.file;
    write_diff(
        out,
        "Chart.yaml",
        &String::from_utf8_lossy(&chart.previous_contents),
        &String::from_utf8_lossy(&chart.new_contents),
    )?;

    for file in &ctx.files {
        write_diff(
            out,
            &file.path,
            &String::from_utf8_lossy(&file.previous_contents),
            &String::from_utf8_lossy(&file.new_contents),
        )?;
    }

    writeln!(out, "{}", style("+----end diff").white())
}
