use anyhow::Result;

use showcase_bgremove::{logging, BackgroundRemover, Config, ConsoleReporter, RemBg};

fn main() -> Result<()> {
    let config = Config::new();
    logging::init();

    // Model availability is checked before the target directory.
    let extractor = RemBg::from_config(&config)?;
    let remover = BackgroundRemover::new(extractor, &config);

    let mut reporter = ConsoleReporter::stdout();
    remover.process_directory(&mut reporter)?;

    Ok(())
}
