mod app;
mod audio;
mod config;
mod library;
mod mpris;
mod runtime;
mod surface;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Quiet by default; RUST_LOG=juke=debug for troubleshooting.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    runtime::run()
}
