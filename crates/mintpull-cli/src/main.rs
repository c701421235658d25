use clap::Parser;

use mintpull_cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = mintpull_cli::run(cli).await {
        eprintln!("mintpull failed: {err:#}");
        std::process::exit(1);
    }
}
