use {
    dynseq::{cases, config::SuiteConfig, harness::Environment},
    std::process,
    tracing::info,
};

fn main() {
    let config = match SuiteConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("collection-suite: {}", e);
            process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(true)
        .init();

    // seeded once, shared by every case in the run
    let mut env = match config.seed {
        Some(seed) => Environment::with_seed(seed),
        None => Environment::from_time(),
    };

    let suite = cases::suite_for(&config);
    let report = suite.run(&mut env);

    info!(
        target: "dynseq::suite",
        seed = env.seed(),
        passed = report.passed(),
        failed = report.failed(),
        "suite finished"
    );
    process::exit(report.exit_code());
}
