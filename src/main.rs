use std::env;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Skip program name
    let argv: Vec<String> = env::args().skip(1).collect();

    if let Err(e) = rf4_perception::app::run(&argv) {
        log::error!("❌ {e}");
        std::process::exit(1);
    }
}
