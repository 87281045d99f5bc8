use bvll_observables::observables::Registry;
use bvll_observables::PredictionConfig;

/// Lists the registered observables, optionally only those whose name contains the
/// first argument.
fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = PredictionConfig::from_env();
    log::debug!("{config:?}");

    let registry = Registry::standard()?;
    let filter = std::env::args().nth(1).unwrap_or_default();

    let mut shown = 0;
    for observable in registry.iter().filter(|o| o.name.contains(filter.as_str())) {
        println!("{}{}", observable.name, observable.arity());
        println!("    {}", observable.description);
        println!("    {}", observable.tex);
        shown += 1;
    }
    log::info!("{shown} of {} observables", registry.len());

    Ok(())
}
