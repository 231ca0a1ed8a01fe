use anyhow::Result;
use asylumstats::{
    config::{PipelineConfig, CONFIG_FILE},
    render::{render_line, render_pie},
    report::print_ranking,
    Pipeline,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let config = PipelineConfig::load_or_default(CONFIG_FILE)?;

    // ─── 3) load, reconcile, aggregate, rank ─────────────────────────
    let output = Pipeline::run(&config)?;
    print_ranking(&output.ranking);

    // ─── 4) charts ───────────────────────────────────────────────────
    render_pie(&output.ranking, &config.chart, &config.pie_chart_png)?;
    info!("wrote {}", config.pie_chart_png.display());
    render_line(&output.ranking, &config.chart, &config.line_chart_png)?;
    info!("wrote {}", config.line_chart_png.display());

    info!("all done");
    Ok(())
}
