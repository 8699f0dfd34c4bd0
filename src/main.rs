use clap::Parser;
use tgbot_app::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    cli::run(args, std::io::stdin(), &mut stdout)
}
