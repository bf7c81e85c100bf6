use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match agenda_search::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(agenda_search::exit_code(&err))
        }
    }
}
