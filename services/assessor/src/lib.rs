mod answers;
mod cli;
mod demo;
mod interactive;
mod render;
mod session;

use heartcare::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
