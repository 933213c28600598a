use es_filter::{cli_parse, run};

fn main() {
    let cli = cli_parse();

    // RUST_LOG takes precedence over -v/-q
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
