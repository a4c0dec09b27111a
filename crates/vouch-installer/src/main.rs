//! vouch-installer copies the vouch assertions into a crate so they can be
//! used without adding a dependency.
//!
//! Run it from the crate root:
//!
//! ```text
//! vouch-installer src/testutil
//! ```
//!
//! `<PATH>` is where the generated `assert` module goes; for libraries a
//! test-only module such as `src/testutil` or `tests/common` is a good fit.

mod app;
mod commands;
mod errors;
mod install;
mod logging;
mod manifest;

fn main() {
    let matches = app::build_cli().get_matches();

    let verbose = matches.get_flag("verbose");
    logging::init_logging(!verbose);

    if let Err(e) = commands::run_command(&matches) {
        // Error already printed to the user by the command handler.
        drop(e);
        std::process::exit(1);
    }
}
