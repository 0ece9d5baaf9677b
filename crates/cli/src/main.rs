//! culting entry point
//!
//! Parses arguments and hands over to the library; the exit status comes
//! back from [`culting::run`].

use clap::Parser;

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let cli = culting::Cli::parse();

    match culting::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let report = miette::Report::msg(format!("{e:#}"));
            eprintln!("{report:?}");
            std::process::exit(1);
        }
    }
}
