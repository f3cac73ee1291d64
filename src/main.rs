mod generate;
mod manifest;
mod serve;

mod err;
mod opt;

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let opt::Options { verbose, command } = clap::Parser::parse();

    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    match command {
        opt::Command::Generate(options) => generate::main(options).await?,
        opt::Command::Serve(options) => serve::main(options).await?,
    }

    Ok(())
}
