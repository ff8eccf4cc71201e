mod bootstrap;

use anyhow::Result;
use netlog_charts::charts::{ChartRenderer, ChartStyle};
use netlog_charts::output_dir::create_plots_dir;
use netlog_core::settings::Settings;
use netlog_core::time_utils::SystemClock;
use netlog_data::pipeline::process_metrics;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("netlog v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, Output: {}",
        settings.input.display(),
        settings.output.display()
    );

    if let Err(e) = run(&settings) {
        tracing::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

/// Process the metrics file, then chart the aggregated table.
fn run(settings: &Settings) -> Result<()> {
    let result = process_metrics(&settings.input, &settings.output)?;
    let meta = &result.metadata;
    tracing::info!(
        "Processed {} rows ({} cells filled) into {} groups in {:.3}s",
        meta.rows_loaded,
        meta.cells_filled,
        meta.groups_aggregated,
        meta.load_time_seconds + meta.transform_time_seconds
    );

    let plots_dir = create_plots_dir(&settings.plots_root, &SystemClock)?;
    let renderer = ChartRenderer::new(ChartStyle::with_size(
        settings.chart_width,
        settings.chart_height,
    ));
    let written = renderer.render_all(&result.records, &plots_dir)?;

    tracing::info!(
        "Done: {} and {} charts in {}",
        settings.output.display(),
        written.len(),
        plots_dir.display()
    );
    Ok(())
}
