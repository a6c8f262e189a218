// Entrypoint for the unload utility.
// - Loads `.env` before parsing so `IMAGE_SERVER_URL` can come from it.
// - Keeps `main` small: build the client and hand it to `ui::run`.

use clap::Parser;
use image_server_unload::{api::ApiClient, config, ui};

fn main() -> anyhow::Result<()> {
    let env_file = config::load_env_file();
    let cli = config::Cli::parse();
    config::init_logging(cli.verbose);
    config::log_env_file(&env_file);

    let api = ApiClient::new(&cli.server, cli.timeout())?;
    log::debug!("using image server at {}", api.base_url());

    let code = ui::run(&api, cli.verbose);
    std::process::exit(code);
}
