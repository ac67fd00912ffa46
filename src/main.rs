mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli_res = cli::cli();

    let err_exit = ExitCode::from(1);
    let ok_exit = ExitCode::from(0);

    match cli_res {
        cli::CliRes::NoCli => {
            println!("thingsmith <decode|encode|sheet> --help");
            err_exit
        }
        cli::CliRes::Ok => ok_exit,
        cli::CliRes::Err => err_exit,
    }
}
