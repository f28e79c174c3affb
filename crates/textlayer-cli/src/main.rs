mod cli;
mod fragments_cmd;
mod page_range;
mod search_cmd;
mod shared;
mod text_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_tracing(cli.verbose);

    let result = match cli.command {
        cli::Commands::Fragments {
            ref file,
            ref pages,
            ref format,
        } => fragments_cmd::run(file, pages.as_deref(), format),
        cli::Commands::Text {
            ref file,
            ref pages,
            ref format,
        } => text_cmd::run(file, pages.as_deref(), format),
        cli::Commands::Search {
            ref file,
            ref query,
            ref pages,
            case_sensitive,
            scale,
            rotation,
            current,
            ref format,
        } => {
            let args = search_cmd::SearchArgs {
                query,
                pages: pages.as_deref(),
                case_sensitive,
                scale,
                rotation,
                current,
            };
            search_cmd::run(file, &args, format)
        }
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
