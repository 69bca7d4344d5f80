#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    portfolio_editor::run_gui().map_err(|e| anyhow::anyhow!("running the editor window: {e}"))
}
