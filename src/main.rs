use std::path::Path;

use triview::{Options, Viewer};

fn main() {
    env_logger::init();

    // Optional first argument: an options TOML file to start from.
    let options = match std::env::args().nth(1) {
        Some(arg) => match Options::load(Path::new(&arg)) {
            Ok(options) => {
                log::info!("loaded options from {arg}");
                options
            }
            Err(e) => {
                log::error!("failed to load {arg}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
