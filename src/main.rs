use bomvault::cli::{Cli, Commands};
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => bomvault::cli::commands::init::run(args),
        Commands::Upload(args) => bomvault::cli::commands::upload::run(args, &global),
        Commands::Tree(args) => bomvault::cli::commands::tree::run(args, &global),
        Commands::Show(args) => bomvault::cli::commands::show::run(args, &global),
        Commands::Bom(cmd) => bomvault::cli::commands::bom::run(cmd, &global),
        Commands::Export(args) => bomvault::cli::commands::export::run(args, &global),
        Commands::Rm(args) => bomvault::cli::commands::rm::run(args, &global),
        Commands::Status(args) => bomvault::cli::commands::status::run(args, &global),
        Commands::Completions(args) => bomvault::cli::commands::completions::run(args),
    }
}
