use std::{
    env,
    io::{self, BufWriter, Write},
    process,
};

use dawglex::{
    cli::CommandLineConfig,
    commands::{self, CommandStatus},
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            eprint!("{}", CommandLineConfig::help());
            process::exit(2);
        }
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = commands::run(&config, &mut out);
    if let Err(err) = out.flush() {
        eprintln!("error: {err}");
        process::exit(1);
    }
    drop(out);
    match result {
        Ok(CommandStatus::Success) => {}
        Ok(status @ CommandStatus::Rejected) => process::exit(status.exit_code()),
        Err(err) => {
            eprintln!("command failed: {err}");
            process::exit(1);
        }
    }
}
