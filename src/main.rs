fn main() -> schemgen::cli::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    schemgen::cli::run()
}
